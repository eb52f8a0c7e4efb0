//! Print the transactions of a bank statement.
//!
//! Usage: `cargo run --example scan_statement -- <provider> <path-to-pdf>`

use omniscan::Scanner;

fn main() {
    let mut args = std::env::args().skip(1);
    let (Some(provider), Some(path)) = (args.next(), args.next()) else {
        eprintln!("Usage: scan_statement <provider> <path-to-pdf>");
        std::process::exit(1);
    };

    let result = Scanner::default()
        .scan_file(&provider, &path)
        .unwrap_or_else(|e| {
            eprintln!("Error scanning statement: {e}");
            std::process::exit(1);
        });

    let header = &result.header;
    println!("{} {} ({})", header.bank, header.account, header.period);
    println!();

    for t in &result.transactions {
        let first_line = t.description1.lines().next().unwrap_or_default();
        println!("{}  {:<6}  {:>16.2}  {first_line}", t.date, t.direction, t.change);
    }
}
