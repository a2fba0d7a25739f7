use crate::commands::print_json;
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use numsift_config::AppConfig;
use numsift_core::Extractor;
use std::io::{self, Read};

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Cell text to extract from; reads stdin when omitted
    pub text: Option<String>,
}

pub fn run(config: &AppConfig, json: bool, args: ExtractArgs) -> Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .with_context(|| "read stdin")?;
            String::from_utf8(buffer).map_err(|_| invalid_input("input is not valid UTF-8"))?
        }
    };

    let extractor = Extractor::with_std_codes(config.landlines.std_codes.clone());
    let numbers = extractor.extract(&text);

    if json {
        return print_json(&numbers);
    }
    for number in &numbers {
        println!("{}", number);
    }
    Ok(())
}
