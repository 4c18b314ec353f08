//! CLI frontend for Kingmaker Ledger, a Pathfinder kingdom sheet.

mod commands;
mod output;
mod session;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::session::Session;

#[derive(Parser)]
#[command(
    name = "km",
    about = "Kingmaker Ledger: run a Pathfinder kingdom turn by turn",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Directory holding kingdom files
    #[arg(long, global = true, default_value = "kingdoms")]
    pub store: PathBuf,

    /// Kingdom id, stored as `<id>.json`
    #[arg(short, long, global = true, default_value = "kingdom")]
    pub kingdom: String,

    /// Engine settings (JSON)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Structure bonuses per settlement (JSON)
    #[arg(long, global = true)]
    pub context: Option<PathBuf>,

    /// RNG seed for reproducible rolls
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Physical die result to use before rolling (repeatable)
    #[arg(long = "roll", global = true)]
    pub rolls: Vec<u32>,
}

/// Options for rolling a check.
#[derive(Args, Debug, Clone, Default)]
pub struct RollArgs {
    /// DC to roll against (default: control DC)
    #[arg(long)]
    pub dc: Option<i32>,

    /// Kingdom turn phase for phase-bound modifiers
    #[arg(long)]
    pub phase: Option<String>,

    /// Use Assurance instead of rolling
    #[arg(long)]
    pub assurance: bool,

    /// Extra modifier as TYPE:VALUE, e.g. circumstance:2 (repeatable)
    #[arg(long = "bonus", allow_hyphen_values = true)]
    pub bonuses: Vec<String>,

    /// Modifier id to switch off for this roll (repeatable)
    #[arg(long)]
    pub disable: Vec<String>,

    /// Modifier id to force on for this roll (repeatable)
    #[arg(long)]
    pub enable: Vec<String>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ChangeModeArg {
    Gain,
    Lose,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new kingdom
    Init {
        /// Kingdom name
        name: Option<String>,

        /// Overwrite an existing kingdom
        #[arg(long)]
        force: bool,
    },

    /// Restore every kingdom value to its default
    Reset,

    /// Show the kingdom sheet
    Show,

    /// Show every skill with its modifier
    Skills,

    /// List kingdom activities and whether they can be attempted
    Activities {
        /// Only activities of this phase
        #[arg(long)]
        phase: Option<String>,
    },

    /// Roll a skill check
    Check {
        /// Skill to roll (e.g. agriculture)
        skill: String,

        #[command(flatten)]
        roll: RollArgs,
    },

    /// Attempt a kingdom activity
    Activity {
        /// Activity (e.g. claim-hex, "Celebrate Holiday")
        activity: String,

        /// Skill to use (default: the first one available)
        #[arg(short, long)]
        skill: Option<String>,

        #[command(flatten)]
        roll: RollArgs,
    },

    /// Move the last outcome one degree up
    Upgrade,

    /// Move the last outcome one degree down
    Downgrade,

    /// Apply an effect of the last outcome: modifier:N, change:N or fame
    ApplyEffect {
        /// The effect to apply
        effect: String,
    },

    /// Roll the last check again: re-roll, fame, keep-higher, keep-lower
    Reroll {
        /// How to roll again
        #[arg(default_value = "re-roll")]
        kind: String,
    },

    /// Gain or lose a resource, e.g. `apply-change lose unrest 1d4`
    ApplyChange {
        /// gain or lose
        #[arg(value_enum)]
        mode: ChangeModeArg,

        /// Resource (unrest, rp, rp-next, fame, food, ore-next, crime, xp, ...)
        resource: String,

        /// Amount: a number or a dice formula
        amount: String,
    },

    /// End the turn: expire modifiers and move next-turn values into now
    EndTurn,

    /// Roll resource dice and gather commodities
    Collect,

    /// Pay this turn's food
    PayConsumption,

    /// Gain unrest from upkeep
    AdjustUnrest,

    /// Check whether a kingdom event happens
    CheckEvent,

    /// Try to reduce unrest by 1 (DC 11 flat check)
    ReduceUnrest,

    /// Try to reduce a ruin penalty by 1 (DC 16 flat check)
    ReduceRuin {
        /// corruption, crime, decay or strife
        axis: String,
    },

    /// Gain (or, when negative, lose) fame points
    Fame {
        /// Points to gain
        #[arg(default_value = "1", allow_negative_numbers = true)]
        amount: i32,
    },

    /// Gain kingdom XP
    Xp {
        #[command(subcommand)]
        source: XpCommand,
    },

    /// Spend XP to gain a kingdom level
    LevelUp,

    /// Claim a hex holding a refuge or landmark
    ClaimFeature {
        /// refuge or landmark
        feature: String,
    },

    /// Manage active modifiers
    Modifier {
        #[command(subcommand)]
        action: ModifierCommand,
    },

    /// Manage settlements
    Settlement {
        #[command(subcommand)]
        action: SettlementCommand,
    },

    /// Replace the list of activities that can not be attempted
    Blacklist {
        /// Activities to block (none clears the list)
        activities: Vec<String>,
    },

    /// Merge a JSON partial update into the kingdom
    Update {
        /// JSON object with camelCase kingdom fields
        patch: String,
    },

    /// Print a date in the Golarion calendar
    Date {
        /// Date and time, e.g. "2023-01-02 09:30:00" (default: now)
        time: Option<String>,
    },

    /// Check the kingdom for impossible or suspicious values
    Validate,
}

#[derive(Subcommand)]
enum XpCommand {
    /// XP for a resolved event
    Event {
        /// Event level minus kingdom level
        #[arg(default_value = "0", allow_negative_numbers = true)]
        level_difference: i32,
    },
    /// XP for newly claimed hexes
    Hexes {
        /// Number of hexes
        count: i32,
    },
    /// XP for unspent RP
    Rp,
    /// XP for unused creative and supernatural solutions
    Solutions,
    /// A fixed amount of XP
    Add {
        /// Amount
        amount: i32,
    },
}

#[derive(Subcommand)]
enum ModifierCommand {
    /// Add a modifier
    Add {
        /// Name shown on the sheet
        name: String,

        /// ability, proficiency, item, status, circumstance or untyped
        kind: String,

        /// Value; negative for penalties
        #[arg(allow_negative_numbers = true)]
        value: i32,

        /// Turns until it expires (default: never)
        #[arg(long)]
        turns: Option<u32>,

        /// Limit to checks of this ability (repeatable)
        #[arg(long = "ability")]
        abilities: Vec<String>,

        /// Limit to this skill (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Limit to this phase (repeatable)
        #[arg(long = "phase")]
        phases: Vec<String>,

        /// Limit to this activity (repeatable)
        #[arg(long = "activity")]
        activities: Vec<String>,
    },
    /// Remove the modifier at a list index
    Remove {
        /// Index shown by `modifier list`
        index: usize,
    },
    /// List active modifiers
    List,
}

#[derive(Subcommand)]
enum SettlementCommand {
    /// Add a settlement
    Add {
        /// Scene id of the settlement map
        id: String,

        /// Settlement level
        #[arg(long, default_value = "1")]
        level: i32,

        /// Occupied lots
        #[arg(long, default_value = "0")]
        lots: i32,

        /// Make it the capital
        #[arg(long)]
        capital: bool,

        /// Lies in a secondary territory
        #[arg(long)]
        secondary: bool,

        /// Has water borders
        #[arg(long)]
        water: bool,
    },
    /// Remove a settlement
    Remove {
        /// Scene id
        id: String,
    },
    /// Choose the settlement the leaders act from (none to clear)
    Activate {
        /// Scene id
        id: Option<String>,
    },
    /// List settlements
    List,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    if let Commands::Date { time } = &cli.command {
        return commands::date::run(time.as_deref());
    }
    let mut session = Session::open(&cli.global)?;

    match cli.command {
        Commands::Init { name, force } => commands::init::run(&mut session, name, force),
        Commands::Reset => commands::init::reset(&mut session),
        Commands::Show => commands::show::run(&session),
        Commands::Skills => commands::skills::run(&session),
        Commands::Activities { phase } => commands::activities::run(&session, phase.as_deref()),
        Commands::Check { skill, roll } => commands::check::skill(&mut session, &skill, &roll),
        Commands::Activity {
            activity,
            skill,
            roll,
        } => commands::check::activity(&mut session, &activity, skill.as_deref(), &roll),
        Commands::Upgrade => commands::outcome::change_degree(&mut session, true),
        Commands::Downgrade => commands::outcome::change_degree(&mut session, false),
        Commands::ApplyEffect { effect } => commands::outcome::apply_effect(&mut session, &effect),
        Commands::Reroll { kind } => commands::outcome::reroll(&mut session, &kind),
        Commands::ApplyChange {
            mode,
            resource,
            amount,
        } => commands::turn::apply_change(
            &mut session,
            matches!(mode, ChangeModeArg::Gain),
            &resource,
            &amount,
        ),
        Commands::EndTurn => commands::turn::end_turn(&mut session),
        Commands::Collect => commands::turn::collect(&mut session),
        Commands::PayConsumption => commands::turn::pay_consumption(&mut session),
        Commands::AdjustUnrest => commands::turn::adjust_unrest(&mut session),
        Commands::CheckEvent => commands::turn::check_event(&mut session),
        Commands::ReduceUnrest => commands::turn::reduce_unrest(&mut session),
        Commands::ReduceRuin { axis } => commands::turn::reduce_ruin(&mut session, &axis),
        Commands::Fame { amount } => commands::turn::fame(&mut session, amount),
        Commands::Xp { source } => {
            use km_engine::XpSource;
            let source = match source {
                XpCommand::Event { level_difference } => XpSource::Event { level_difference },
                XpCommand::Hexes { count } => XpSource::Hexes { count },
                XpCommand::Rp => XpSource::ResourcePoints,
                XpCommand::Solutions => XpSource::Solutions,
                XpCommand::Add { amount } => XpSource::Custom(amount),
            };
            commands::turn::xp(&mut session, source)
        }
        Commands::LevelUp => commands::turn::level_up(&mut session),
        Commands::ClaimFeature { feature } => commands::turn::claim_feature(&mut session, &feature),
        Commands::Modifier { action } => match action {
            ModifierCommand::Add {
                name,
                kind,
                value,
                turns,
                abilities,
                skills,
                phases,
                activities,
            } => commands::modifier::add(
                &mut session,
                commands::modifier::NewModifier {
                    name,
                    kind,
                    value,
                    turns,
                    abilities,
                    skills,
                    phases,
                    activities,
                },
            ),
            ModifierCommand::Remove { index } => commands::modifier::remove(&mut session, index),
            ModifierCommand::List => commands::modifier::list(&session),
        },
        Commands::Settlement { action } => match action {
            SettlementCommand::Add {
                id,
                level,
                lots,
                capital,
                secondary,
                water,
            } => commands::settlement::add(
                &mut session,
                commands::settlement::NewSettlement {
                    id,
                    level,
                    lots,
                    capital,
                    secondary,
                    water,
                },
            ),
            SettlementCommand::Remove { id } => commands::settlement::remove(&mut session, id),
            SettlementCommand::Activate { id } => commands::settlement::activate(&mut session, id),
            SettlementCommand::List => commands::settlement::list(&session),
        },
        Commands::Blacklist { activities } => commands::update::blacklist(&mut session, &activities),
        Commands::Update { patch } => commands::update::run(&mut session, &patch),
        Commands::Validate => commands::validate::run(&session),
        Commands::Date { .. } => Ok(()),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
