mod autoplay;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use match3_engine::config::{ConfigManager, FileContentConfigProvider, YamlConfigSerializer};
use match3_engine::games::match3::{Campaign, CampaignEvent, Difficulty, LevelEvent};
use match3_engine::{log, logger, GameConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
enum DifficultyArg {
    #[default]
    Easy,
    Moderate,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Moderate => Difficulty::Moderate,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser)]
#[command(name = "match3_cli")]
struct Args {
    /// Seed for board generation and refills; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = DifficultyArg::Easy)]
    difficulty: DifficultyArg,

    /// YAML game config; defaults are used when the file does not exist
    #[arg(long, default_value = "match3_config.yaml")]
    config: PathBuf,

    /// Overrides board_size from the config
    #[arg(long)]
    board_size: Option<usize>,

    /// Number of consecutive levels to play
    #[arg(long, default_value_t = 1)]
    levels: u32,

    #[arg(long, default_value_t = 1000)]
    max_turns: u32,

    /// Print the board after every turn
    #[arg(long)]
    show_board: bool,

    #[arg(long)]
    use_log_prefix: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Match3".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<FileContentConfigProvider, GameConfig, YamlConfigSerializer> =
        ConfigManager::from_yaml_file(args.config.clone());
    let mut config = config_manager.get_config()?;
    if let Some(board_size) = args.board_size {
        config.board_size = board_size;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut campaign = Campaign::new(args.difficulty.into(), &config, Some(seed))?;
    log!(
        "Playing {} level(s) of {} on a {}x{} board with seed {}",
        args.levels,
        campaign.difficulty(),
        config.board_size,
        config.board_size,
        seed
    );
    if args.show_board {
        println!("{}", campaign.session().board().render());
    }

    let show_board = args.show_board;
    let summary = autoplay::run(&mut campaign, args.levels, args.max_turns, |campaign, resolution| {
        let session = campaign.session();
        log!(
            "Level {} move {}: +{} points (score {}, {} moves left)",
            campaign.current_level(),
            session.moves_made(),
            resolution.score_delta,
            session.score(),
            session.moves_left()
        );
        if show_board {
            println!("{}", session.board().render());
        }
    })?;

    for event in campaign.take_events() {
        match event {
            CampaignEvent::Level(LevelEvent::BoardReshuffled) => {
                log!("Board was reshuffled during play");
            }
            CampaignEvent::LevelStartFailed { level, reason } => {
                log!("Level {} could not start: {}", level, reason);
            }
            _ => {}
        }
    }

    let outcome = if summary.levels_completed >= args.levels {
        "Won"
    } else {
        "Stopped"
    };
    println!(
        "{}: {} level(s) completed, total score {} in {} turns (specials created: {}, combos: {}, longest cascade: {})",
        outcome,
        summary.levels_completed,
        summary.total_score,
        summary.turns,
        summary.specials_created,
        summary.combos,
        summary.longest_cascade
    );

    Ok(())
}
