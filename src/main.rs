use clap::Parser;
use koe_extract::{
    init_logging, Cli, KoeError, KoeExtract, OutputFormatter, OutputMode, UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Help and version are not failures; every usage error is
            return if e.use_stderr() { 1 } else { 0 };
        }
    };

    init_logging(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let koe = match KoeExtract::from_cli(&cli) {
        Ok(koe) => koe,
        Err(e) => {
            print_startup_error(&e);
            return 1;
        }
    };

    let Some(input) = cli.input.as_deref() else {
        koe.output_formatter().error("No input file given");
        return 1;
    };

    if cli.dry_run {
        return match koe.probe(input) {
            Ok(probe) => {
                koe.output_formatter().print_probe_result(&probe);
                0
            }
            Err(e) => {
                koe.handle_error(&e);
                1
            }
        };
    }

    match koe.extract_audio(input) {
        Ok(report) => {
            koe.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            log::debug!("extraction failed: {:?}", e);
            koe.handle_error(&e);
            1
        }
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let formatter = OutputFormatter::new(cli.output_mode(), cli.verbosity_level(), cli.quiet);
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "koe-extract.toml".to_string());

    match KoeExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            formatter.success(&format!("Generated sample configuration file: {}", config_path));
            formatter.info(&format!(
                "Use it with: koe-extract <input.koe> --config {}",
                config_path
            ));
            0
        }
        Err(e) => {
            formatter.error(&format!(
                "Failed to generate configuration file: {}",
                e.user_message()
            ));
            1
        }
    }
}

fn print_startup_error(error: &KoeError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
