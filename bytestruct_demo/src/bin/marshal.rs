use std::error::Error;
use std::io::{self, Write};

use bytestruct::ByteOrder;
use bytestruct_demo::{Sample, init_logging, parse_order};

/// `marshal [sample] [big|little]`
///
/// With no sample, prints the bytes of every sample as decimal lists. With
/// one, writes its raw bytes to stdout.
fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let args: Vec<String> = std::env::args().collect();
    let order = match args.get(2) {
        Some(s) => parse_order(s)?,
        None => ByteOrder::BigEndian,
    };

    match args.get(1).map(|s| s.as_str()) {
        None | Some("all") => {
            for sample in Sample::ALL {
                let data = sample.encode(order)?;
                println!("{}: {:?}", sample.name(), data);
            }
        }
        Some(name) => {
            let data = name.parse::<Sample>()?.encode(order)?;
            io::stdout().write_all(&data)?;
        }
    }
    Ok(())
}
