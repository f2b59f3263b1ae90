use std::error::Error;
use std::io::{stdin, stdout, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use lcxl3::config::{self, Settings};
use lcxl3::editor::batch::{self, Interruption};
use lcxl3::editor::Outcome;
use lcxl3::{assign, editor, factory, store, CcDirection, CcMode, GeneratorConfig};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { profile, leds } => run_generate(profile, leds),
        Commands::Leds { template, profile } => run_leds(template.as_deref(), profile),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

fn run_generate(profile: ProfileArgs, leds: bool) -> Result<(), Box<dyn Error>> {
    let config = profile.resolve()?;
    let templates = assign::generate(&config, factory::image()?)?;
    let paths = store::write_batch(&config.output_dir, &config.output_prefix, &templates)?;

    for (path, template) in paths.iter().zip(&templates) {
        println!(
            "T{:02}  channel {:>2}  {}",
            template.number(),
            config.channel_for(template.number()) + 1,
            path.display()
        );
    }

    if leds {
        let report = batch::edit_files(&paths, editor::terminal::edit, ask_continue)?;
        for path in &report.saved {
            println!("saved {}", path.display());
        }
        for path in report.unchanged.iter().chain(&report.skipped) {
            println!("left {} unchanged", path.display());
        }
        for path in &report.failed {
            println!("failed to edit {}", path.display());
        }
    }
    Ok(())
}

fn ask_continue(interruption: &Interruption) -> lcxl3::Result<bool> {
    match interruption {
        Interruption::Cancelled => print!("Continue with remaining templates? [Y/n] "),
        Interruption::Failed(_) => {
            print!("Error occurred. Continue with remaining templates? [Y/n] ")
        }
    }
    yes_no().map_err(lcxl3::Error::Terminal)
}

fn yes_no() -> Result<bool, std::io::Error> {
    let mut answer = String::new();
    loop {
        stdout().flush()?;
        answer.clear();
        if stdin().read_line(&mut answer)? == 0 {
            // Closed stdin can't confirm anything
            return Ok(false);
        }

        let buf = answer.trim_end().to_lowercase();
        if buf.is_empty() || buf == "y" {
            return Ok(true);
        }
        if buf == "n" {
            return Ok(false);
        }
        print!("[Y/n] ");
    }
}

fn run_leds(target: Option<&Path>, profile: ProfileArgs) -> Result<(), Box<dyn Error>> {
    let config = profile.resolve()?;

    match target {
        Some(target) => {
            let path = store::resolve(target, &config.output_dir)?;
            edit_file(&path)
        }
        None => {
            let single = GeneratorConfig {
                template_count: 1,
                ..config
            };
            let template = assign::generate(&single, factory::image()?)?.remove(0);
            if let Some(edited) = editor::terminal::edit(template)?.saved() {
                let paths =
                    store::write_batch(&single.output_dir, &single.output_prefix, &[edited])?;
                for path in paths {
                    println!("saved {}", path.display());
                }
            }
            Ok(())
        }
    }
}

fn edit_file(path: &Path) -> Result<(), Box<dyn Error>> {
    let template = store::read_template(path)?;
    log::info!("editing LEDs of {}", path.display());

    match editor::terminal::edit(template)? {
        Outcome::Saved(edited) => {
            store::write_template(path, &edited)?;
            println!("saved {}", path.display());
        }
        Outcome::Cancelled | Outcome::Aborted => println!("left {} unchanged", path.display()),
    }
    Ok(())
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Custom mode generator and LED editor for the Launch Control XL 3", long_about = None)]
struct Cli {
    /// Log debug output. RUST_LOG takes precedence
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a bank of custom mode templates
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,
        /// Edit the LED colors of every written template afterwards
        #[arg(long)]
        leds: bool,
    },
    /// Edit the LED colors of a template file
    Leds {
        /// Template file, looked up in the output directory if it doesn't exist as given. Without
        /// one, a fresh template is generated and saved as <prefix>_T01.syx
        template: Option<PathBuf>,
        #[command(flatten)]
        profile: ProfileArgs,
    },
}

/// Generator settings. Flags override the values of a --config profile.
#[derive(Args, Debug)]
struct ProfileArgs {
    /// Number of templates, 1 to 15
    #[arg(short = 'c', long = "count")]
    template_count: Option<u8>,
    /// Put every template on this MIDI channel (1 to 16) instead of one channel per template
    #[arg(short = 'g', long = "global-channel")]
    global_channel: Option<u8>,
    /// Continue CC numbers across templates instead of restarting each template
    #[arg(long)]
    cc_continuous: bool,
    /// First CC number to hand out, 13 to 120
    #[arg(long = "min-cc")]
    first_cc: Option<u8>,
    /// Count CC numbers down from the top of the range
    #[arg(long)]
    cc_reverse: bool,
    #[arg(long)]
    output_prefix: Option<String>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// YAML generator profile
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

impl ProfileArgs {
    fn resolve(self) -> lcxl3::Result<GeneratorConfig> {
        let base = match &self.config {
            Some(path) => config::load(path)?,
            None => Settings::default(),
        };
        let flags = Settings {
            template_count: self.template_count,
            global_channel: self.global_channel,
            cc_mode: self.cc_continuous.then_some(CcMode::Continuous),
            first_cc: self.first_cc,
            direction: self.cc_reverse.then_some(CcDirection::Descending),
            output_prefix: self.output_prefix,
            output_dir: self.output_dir,
        };

        let config = base.merge(flags).into_config()?;
        log::debug!("{:?}", config);
        Ok(config)
    }
}
