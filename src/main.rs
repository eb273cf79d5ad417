//! Trisect command line

use std::io;

use anyhow::Result;
use clap::Parser;
use trisect::{
    config::{Command, Config, OutputFormat},
    logging::init_subscriber,
    planner::{check_split, plan_imperfect, plan_perfect},
    report::{write_check, write_json, write_options, write_perfect},
};

fn main() -> Result<()> {
    let config = Config::parse();

    init_subscriber(&config.logging)?;

    let args = config.command.args();
    let request = args.request()?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match (&config.command, args.format) {
        (Command::Perfect(_), OutputFormat::Table) => {
            write_perfect(&mut handle, &plan_perfect(&request)?)?;
        }
        (Command::Perfect(_), OutputFormat::Json) => {
            write_json(&mut handle, &plan_perfect(&request)?)?;
        }
        (Command::Imperfect(_), OutputFormat::Table) => {
            write_options(&mut handle, &plan_imperfect(&request)?)?;
        }
        (Command::Imperfect(_), OutputFormat::Json) => {
            write_json(&mut handle, &plan_imperfect(&request)?)?;
        }
        (Command::Check(_), format) => {
            let check = check_split(
                &request.bills,
                request.target_amount.unwrap_or(0),
                &request.allowed(),
            )?;

            match format {
                OutputFormat::Table => write_check(&mut handle, &check)?,
                OutputFormat::Json => write_json(&mut handle, &check)?,
            }
        }
    }

    Ok(())
}
