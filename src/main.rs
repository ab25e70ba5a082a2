#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use battleship_server::{
    init_logging, server, spawn_lobby, BotPlayer, ClientNode, InMemoryTransport, Lobby,
    ServerConfig, TcpTransport, TerminalPlayer,
};

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Bot,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Run the match server and pair every client that connects.
    Serve {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "PORT", default_value_t = server::DEFAULT_PORT)]
        port: u16,
        #[arg(long, help = "Fix RNG seed for reproducible fleets (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Connect to a match server and play.
    Play {
        #[arg(long, default_value = "127.0.0.1:8900")]
        connect: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Stop after this many finished matches")]
        games: Option<usize>,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Two bots play one match against an in-process server.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_rng(&mut rand::rng()),
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, seed } => {
            if let Some(s) = seed {
                log::info!("using fixed seed {}", s);
            }
            let config = ServerConfig {
                host,
                port,
                seed,
                ..ServerConfig::default()
            };
            server::run(config).await?;
        }
        Commands::Play {
            connect,
            player,
            games,
            seed,
        } => {
            println!("Connecting to match server at {}...", connect);
            let transport = TcpTransport::connect(&connect).await?;
            let summary = match player {
                PlayerType::Human => {
                    ClientNode::new(transport, TerminalPlayer::new())
                        .run(games)
                        .await?
                }
                PlayerType::Bot => {
                    let bot = BotPlayer::new(make_rng(seed));
                    ClientNode::new(transport, bot).run(games).await?
                }
            };
            println!(
                "Played {} match(es), won {}.",
                summary.games, summary.wins
            );
        }
        Commands::Local { seed } => {
            println!("Starting local bot vs bot match...");
            let lobby = match seed {
                Some(s) => {
                    println!("Using fixed seed: {} (match will be reproducible)", s);
                    Lobby::with_seed(s)
                }
                None => Lobby::from_entropy(),
            };
            let handle = spawn_lobby(lobby);

            let (client1, server1) = InMemoryTransport::pair();
            let (client2, server2) = InMemoryTransport::pair();
            handle.attach(server1);
            handle.attach(server2);

            let bot1 = BotPlayer::new(make_rng(seed));
            let bot2 = BotPlayer::new(make_rng(seed.map(|s| s.wrapping_add(1))));
            let mut node1 = ClientNode::new(client1, bot1);
            let mut node2 = ClientNode::new(client2, bot2);

            let (first, second) = tokio::try_join!(node1.run(Some(1)), node2.run(Some(1)))?;
            for summary in [first, second] {
                let outcome = if summary.wins > 0 { "won" } else { "lost" };
                println!("Bot {} {}.", summary.connection, outcome);
            }
        }
    }
    Ok(())
}
