use codecheck_core::render::DEFAULT_FIGURE_EXTENSIONS;
use codecheck_core::{CertificateReport, OpenOptions, ReportError, ReportStyle, ValidateOptions};

use super::exit_codes;
use crate::cli::args::{RenderArgs, Section};

/// Render one section to stdout. Sections never consult the register.
pub fn run(args: RenderArgs) -> anyhow::Result<i32> {
    let options = OpenOptions {
        validate: args.validate,
        strict: args.strict,
    };
    let report = match CertificateReport::open(&args.config, options, None) {
        Ok(report) => report,
        Err(e) => return Ok(report_failure(&e)),
    };

    let rendered = match args.section {
        Section::Title => report.title(),
        Section::SummaryTable => report.summary_table(),
        Section::Files => report.files(!args.keep_dirname),
        Section::Summary => report.summary(),
        Section::Citation => report.citation(),
        Section::About => Ok(report.about()),
        Section::ManifestSummary => Ok(report.manifest_summary()),
        Section::Csv => report.csv_files(),
        Section::LatexFigures => {
            let extensions: Vec<&str> = if args.extensions.is_empty() {
                DEFAULT_FIGURE_EXTENSIONS.to_vec()
            } else {
                args.extensions.iter().map(String::as_str).collect()
            };
            report.latex_figures(&extensions)
        }
        Section::ValidationReport => Ok(report.validation_report(
            &ValidateOptions::default(),
            None,
            ReportStyle::Markdown,
        )),
    };

    match rendered {
        Ok(text) => {
            println!("{}", text);
            Ok(exit_codes::OK)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

fn report_failure(e: &ReportError) -> i32 {
    eprintln!("✖ {}", e);
    match e {
        ReportError::Document(_) => exit_codes::CONFIG_ERROR,
        _ => exit_codes::FAILED,
    }
}
