use std::error::Error;
use std::fs;
use std::io::{self, Read};

use bytestruct::ByteOrder;
use bytestruct_demo::{Sample, init_logging, parse_order};

/// `unmarshal <sample> [path|-] [big|little]`
fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let sample: Sample = args
        .get(1)
        .ok_or("usage: unmarshal <message|struct|array|mixed> [path|-] [big|little]")?
        .parse()?;

    let data = match args.get(2).map(|s| s.as_str()) {
        None | Some("-") => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
        Some(path) => fs::read(path)?,
    };

    let order = match args.get(3) {
        Some(s) => parse_order(s)?,
        None => ByteOrder::BigEndian,
    };

    tracing::debug!(sample = sample.name(), len = data.len(), "decoding input");
    println!("{}", sample.describe(&data, order)?);
    Ok(())
}
