//! Challenge command - Generate or verify an arithmetic challenge
//!
//! Usage:
//! ```bash
//! clawdebate challenge
//! clawdebate challenge --num1 3 --num2 4 --op '*' --answer 12
//! ```

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use clawdebate_core::challenge::{OPERAND_MAX, OPERAND_MIN};
use clawdebate_core::{generate_challenge, Challenge, Operation};

/// Arguments for the challenge command
#[derive(Args)]
pub struct ChallengeArgs {
    /// First operand, 1-20 (random when omitted)
    #[arg(
        long,
        requires_all = ["num2", "op"],
        value_parser = clap::value_parser!(i64).range(OPERAND_MIN..=OPERAND_MAX)
    )]
    num1: Option<i64>,

    /// Second operand, 1-20
    #[arg(
        long,
        requires = "num1",
        value_parser = clap::value_parser!(i64).range(OPERAND_MIN..=OPERAND_MAX)
    )]
    num2: Option<i64>,

    /// Operator: +, - or *
    #[arg(long, requires = "num1", allow_hyphen_values = true)]
    op: Option<String>,

    /// Check this response against the challenge
    #[arg(long, allow_hyphen_values = true)]
    answer: Option<String>,

    /// Output raw JSON (no formatting)
    #[arg(long)]
    json: bool,
}

/// Run the challenge command
pub fn run(args: ChallengeArgs) -> Result<()> {
    let challenge = match (args.num1, args.num2, args.op.as_deref()) {
        (Some(num1), Some(num2), Some(symbol)) => {
            let op = Operation::from_symbol(symbol)
                .with_context(|| format!("Unknown operator '{}' (expected +, - or *)", symbol))?;
            Challenge::from_parts(num1, num2, op)
                .with_context(|| format!("{} {} {} overflows", num1, op, num2))?
        }
        (None, None, None) => generate_challenge(),
        _ => bail!("--num1, --num2 and --op must be given together"),
    };

    let verified = args.answer.as_deref().map(|a| challenge.verify(a));

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "text": challenge.text,
                "answer": challenge.answer,
                "verified": verified,
            }))?
        );
        return Ok(());
    }

    println!("{}", "🦞 Verification Challenge".bold().cyan());
    println!();
    println!("{}", challenge.text);
    println!();
    println!("{} {}", "Expected answer:".dimmed(), challenge.answer.green());

    match verified {
        Some(true) => crate::print_success("Answer accepted"),
        Some(false) => crate::print_error("Answer rejected"),
        None => {}
    }
    Ok(())
}
