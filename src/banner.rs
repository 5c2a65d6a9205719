// src/banner.rs

/// Prints the application startup banner to the console.
pub fn print_banner() {
    let banner = r#"
              _                   _
  __ _ _   _ (_)____  ___  ___ | |_   _____ _ __
 / _` | | | || |_  / / __|/ _ \| \ \ / / _ \ '__|
| (_| | |_| || |/ /  \__ \ (_) | |\ V /  __/ |
 \__, |\__,_||_/___| |___/\___/|_| \_/ \___|_|
    |_|

    LLM Analysis Quiz Solver
"#;
    println!("{}", banner);
}
