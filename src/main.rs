use safe_txe::{Input, circuit};
use std::{env, process};

/// Arguments:
/// 1. <hex> RLP-encoded public input
/// 2. <hex> RLP-encoded private input
fn main() {
    let mut args = env::args().skip(1);
    let (Some(public), Some(private)) = (args.next(), args.next()) else {
        eprintln!("usage: safe-txe <public> <private>");
        process::exit(2);
    };

    let result = Input::parse(&public, &private).and_then(|input| circuit(&input));
    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}
