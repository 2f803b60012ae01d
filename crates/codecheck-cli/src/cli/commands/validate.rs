use codecheck_core::{
    validate, RegisterClient, RegisterConfig, RegisterLookup, ReportStyle, ValidateOptions,
    ValidationOutcome,
};
use serde_json::json;

use super::{exit_codes, load_document, plural};
use crate::cli::args::{ValidateArgs, ValidateFormat};

pub fn run(args: ValidateArgs) -> anyhow::Result<i32> {
    let doc = match load_document(&args.config.config) {
        Ok(doc) => doc,
        Err(e) => {
            let outcome = ValidationOutcome {
                passed: false,
                issues: vec![e.to_issue()],
            };
            let exit_code = exit_codes::CONFIG_ERROR;
            print_report(&outcome, &args, exit_code)?;
            return Ok(exit_code);
        }
    };

    let mut options = ValidateOptions::default()
        .with_check_manifest(!args.no_manifest)
        .with_strict(args.strict);
    if let Some(base_dir) = &args.config.base_dir {
        options = options.with_base_dir(base_dir);
    }

    // A client that fails to build degrades to a register warning inside the run.
    let client = if args.no_register {
        None
    } else {
        let mut config = RegisterConfig::from_env();
        if let Some(timeout) = args.timeout {
            config = config.with_timeout_secs(timeout);
        }
        Some(RegisterClient::new(config))
    };
    let register = client.as_ref().map(|c| c as &dyn RegisterLookup);

    let outcome = validate(&doc, &options, register);
    let exit_code = if outcome.passed {
        exit_codes::OK
    } else {
        exit_codes::FAILED
    };

    print_report(&outcome, &args, exit_code)?;
    Ok(exit_code)
}

fn print_report(
    outcome: &ValidationOutcome,
    args: &ValidateArgs,
    exit_code: i32,
) -> anyhow::Result<()> {
    match args.format {
        ValidateFormat::Json => {
            let output = json!({
                "config": args.config.config,
                "passed": outcome.passed,
                "exit_code": exit_code,
                "summary": outcome.summary(),
                "issues": outcome.issues,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        ValidateFormat::Markdown => println!("{}", outcome.report(ReportStyle::Markdown)),
        ValidateFormat::Text => {
            println!("{}", outcome.report(ReportStyle::Text));

            let summary = outcome.summary();
            if !outcome.passed {
                eprintln!(
                    "✖ Validation failed ({} error{}, {} warning{})",
                    summary.errors,
                    plural(summary.errors),
                    summary.warnings,
                    plural(summary.warnings)
                );
            } else if summary.warnings > 0 {
                eprintln!(
                    "⚠️  Validation passed with warnings ({} warning{})",
                    summary.warnings,
                    plural(summary.warnings)
                );
            } else {
                eprintln!("✔ Validation OK");
            }
        }
    }
    Ok(())
}
