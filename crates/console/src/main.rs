//! Herald console binary.
//!
//! Reads commands from stdin as the console sender and prints replies.
//! Lines that resolve to no command are reported as unknown.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use herald_console::{CommandBridge, ConsoleConfig, ConsoleSender, MessageEvent, Reply, input, logging, register_builtins};
use herald_invocation::Dispatcher;
use herald_registry::{CommandRegistry, CommandSender};
use herald_worker::TaskClass;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Console command line arguments.
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Chat-bot command console")]
struct Args {
	/// Configuration file
	#[arg(short, long, value_name = "PATH", default_value = "herald.toml")]
	config: PathBuf,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();
	let config = ConsoleConfig::load(&args.config)?;

	logging::setup_tracing(args.verbose, config.log_filter.as_deref());
	info!(bot = %config.bot_id, prefix = %config.commands.prefix, "starting herald");

	let shutdown = CancellationToken::new();
	let registry = Arc::new(CommandRegistry::new());
	register_builtins(&registry, &config.commands.prefix, shutdown.clone())?;

	let dispatcher = Dispatcher::new(registry, config.commands.clone()).with_cancellation(shutdown.clone());
	let bridge = Arc::new(CommandBridge::new(config.bot_id, dispatcher));

	let (outbox, mut replies) = mpsc::unbounded_channel::<Reply>();
	let (inbound_tx, inbound_rx) = mpsc::channel::<MessageEvent>(64);
	let (downstream_tx, mut downstream_rx) = mpsc::channel::<MessageEvent>(64);

	let listener = herald_worker::spawn(TaskClass::Listener, Arc::clone(&bridge).listen(inbound_rx, downstream_tx));

	let console: Arc<dyn CommandSender> = Arc::new(ConsoleSender::new(outbox));
	let prefix = config.commands.prefix.clone();
	herald_worker::spawn_named_thread(TaskClass::IoBlocking, "herald-console-input", move || {
		let forwarded = input::read_lines(std::io::stdin().lock(), console, &prefix, &inbound_tx);
		tracing::debug!(forwarded, "console input closed");
	})?;

	loop {
		tokio::select! {
			() = shutdown.cancelled() => break,
			reply = replies.recv() => match reply {
				Some(reply) => print_reply(&reply),
				None => break,
			},
			event = downstream_rx.recv() => match event {
				Some(event) => println!("Unknown command: {}", event.message),
				None => break,
			},
		}
	}

	info!("stopping herald");
	bridge.shutdown();
	listener.await?;
	while let Ok(reply) = replies.try_recv() {
		print_reply(&reply);
	}
	std::io::stdout().flush()?;
	Ok(())
}

fn print_reply(reply: &Reply) {
	println!("{}", reply.text);
}
