// Beatloom CLI - Render grooves from a settings file
// Loads sounds, generates, exports WAV and optionally locks in a preset

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use beatloom::audio::SoundBank;
use beatloom::groove::NoteLengthPool;
use beatloom::pipeline::{GenerationOutcome, GenerationState, GrooveSession, GrooveSettings};
use beatloom::render::{to_wav_bytes, ExportFormat};
use beatloom::state::{get_preset_dir, list_presets, save_preset, Preset};

#[derive(Parser)]
#[command(name = "beatloom")]
#[command(about = "Procedural groove generator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a groove and render it to WAV
    Generate {
        /// Path to the settings JSON
        settings: PathBuf,

        /// Sound directory laid out as <instrument>/<variant>.wav
        #[arg(short, long)]
        sounds: PathBuf,

        /// Output WAV file
        #[arg(short, long, default_value = "groove.wav")]
        output: PathBuf,

        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Write 32-bit float samples instead of 16-bit
        #[arg(long)]
        float: bool,

        /// Save the result as a preset with this name
        #[arg(long)]
        preset: Option<String>,

        /// Also lock the groove sequences into the preset
        #[arg(long)]
        lock_sequences: bool,

        /// Preset directory (defaults to the app data directory)
        #[arg(long)]
        preset_dir: Option<PathBuf>,
    },

    /// Validate settings without rendering
    Check {
        /// Path to the settings JSON
        settings: PathBuf,
    },

    /// List saved presets
    Presets {
        /// Preset directory (defaults to the app data directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            settings,
            sounds,
            output,
            seed,
            float,
            preset,
            lock_sequences,
            preset_dir,
        } => {
            let settings = GrooveSettings::load(&settings)
                .with_context(|| format!("Failed to load settings {:?}", settings))?;
            let bank = SoundBank::load_dir(&sounds, &settings.instruments)?;

            let seed = seed.unwrap_or_else(rand::random);
            log::info!("Using seed {}", seed);
            let mut rng = StdRng::seed_from_u64(seed);

            let session = GrooveSession::new();
            let generated = match session.generate(&settings, &bank, &mut rng).await? {
                GenerationOutcome::Completed(generated) => generated,
                GenerationOutcome::Superseded => anyhow::bail!("Generation was superseded"),
            };

            for (instrument, hit_types) in generated.all_hit_types() {
                log::debug!("{}: {:?}", instrument, hit_types);
            }

            let format = if float { ExportFormat::Float32 } else { ExportFormat::Int16 };
            let bytes = to_wav_bytes(&generated.buffer, format)?;
            tokio::fs::write(&output, bytes)
                .await
                .with_context(|| format!("Failed to write {:?}", output))?;
            log::info!(
                "Wrote {:.2}s to {:?}",
                generated.buffer.duration_secs(),
                output
            );

            if let Some(name) = preset {
                let dir = match preset_dir {
                    Some(dir) => dir,
                    None => get_preset_dir()?,
                };
                let preset = Preset::lock_in(name, &settings, &generated, lock_sequences);
                let (path, hash) = save_preset(&dir, &preset)?;
                log::info!("Preset {} saved to {:?} (sha256 {})", preset.id, path, hash);
            }
        }

        Commands::Check { settings } => {
            log::info!("Checking settings {:?}", settings);
            let settings = GrooveSettings::load(&settings)?;
            let pool = NoteLengthPool::from_lengths(&settings.config.allowed_lengths)?;

            let state = GenerationState::capture(&settings);
            println!("fingerprint: {}", state.fingerprint());
            println!("length: {:.2}s", settings.config.length_secs());
            println!("pool: {} lengths, total weight {}", pool.len(), pool.total_weight());
            println!("instruments: {}", settings.instruments.len());
            log::info!("Settings are valid!");
        }

        Commands::Presets { dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => get_preset_dir()?,
            };
            for preset in list_presets(&dir)? {
                println!(
                    "{}  {}  {}",
                    preset.id,
                    preset.created_at.format("%Y-%m-%d %H:%M"),
                    preset.name
                );
            }
        }
    }

    Ok(())
}
