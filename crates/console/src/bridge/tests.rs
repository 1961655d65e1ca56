use std::time::Duration;

use async_trait::async_trait;
use herald_primitives::Segment;
use herald_registry::{Command, CommandContext, CommandError, CommandOwner, CommandRef, CommandRegistry, Permission, SendError, SenderIdentity};
use pretty_assertions::assert_eq;
use rstest::rstest;
use tokio::sync::mpsc::error::TryRecvError;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::builtins::Echo;
use crate::config::ConsoleConfig;
use crate::sender::{ConsoleSender, Outbox, Reply};

const BOT: UserId = UserId(123);
const CONFIG: &str = "bot_id = 123\noperators = [8]";

#[derive(Clone, Copy)]
enum Act {
	Fail,
	Panic,
	AwaitCancel,
}

struct Fixture {
	names: Vec<String>,
	owner: CommandOwner,
	permission: Permission,
	prefix_optional: bool,
	act: Act,
}

impl Fixture {
	fn new(name: &str, permission: Permission, prefix_optional: bool, act: Act) -> CommandRef {
		Arc::new(Self {
			names: vec![name.to_owned()],
			owner: CommandOwner::new("tests"),
			permission,
			prefix_optional,
			act,
		})
	}
}

#[async_trait]
impl Command for Fixture {
	fn names(&self) -> &[String] {
		&self.names
	}

	fn owner(&self) -> &CommandOwner {
		&self.owner
	}

	fn permission(&self) -> Permission {
		self.permission
	}

	fn prefix_optional(&self) -> bool {
		self.prefix_optional
	}

	async fn execute(&self, ctx: CommandContext<'_>) -> Result<CommandOutcome, CommandError> {
		match self.act {
			Act::Fail => Err(CommandError::Failed("disk full".into())),
			Act::Panic => panic!("boom"),
			Act::AwaitCancel => {
				ctx.cancel.cancelled().await;
				Ok(CommandOutcome::Output("cancelled".into()))
			}
		}
	}
}

/// Sender whose reply path panics, outside the dispatcher's handler guard.
struct Crashing;

#[async_trait]
impl CommandSender for Crashing {
	fn identity(&self) -> SenderIdentity {
		SenderIdentity::User(UserId(66))
	}

	fn has_permission(&self, _command: &dyn Command) -> bool {
		true
	}

	async fn reply(&self, _text: &str) -> Result<(), SendError> {
		panic!("reply transport crashed")
	}
}

struct Harness {
	bridge: Arc<CommandBridge>,
	config: ConsoleConfig,
	tx: Outbox,
	outbox: mpsc::UnboundedReceiver<Reply>,
	user: Arc<dyn CommandSender>,
	console: Arc<dyn CommandSender>,
}

impl Harness {
	fn new() -> Self {
		let registry = Arc::new(CommandRegistry::new());
		let commands: Vec<CommandRef> = vec![
			Arc::new(Echo::default()),
			Fixture::new("fail", Permission::Anyone, false, Act::Fail),
			Fixture::new("ban", Permission::Operator, false, Act::Fail),
			Fixture::new("peek", Permission::Operator, true, Act::Fail),
			Fixture::new("wait", Permission::Anyone, false, Act::AwaitCancel),
			Fixture::new("boom", Permission::Anyone, false, Act::Panic),
		];
		for command in &commands {
			registry.register(command, false).unwrap();
		}

		let config = ConsoleConfig::parse(CONFIG).unwrap();
		let (tx, outbox) = mpsc::unbounded_channel();
		let dispatcher = Dispatcher::new(registry, config.commands.clone());
		Self {
			bridge: Arc::new(CommandBridge::new(config.bot_id, dispatcher)),
			user: Arc::new(config.chat_sender(UserId(7), tx.clone())),
			console: Arc::new(ConsoleSender::new(tx.clone())),
			config,
			tx,
			outbox,
		}
	}

	fn chat(&self, user: u64) -> Arc<dyn CommandSender> {
		Arc::new(self.config.chat_sender(UserId(user), self.tx.clone()))
	}

	async fn handle(&self, sender: &Arc<dyn CommandSender>, message: impl Into<RichMessage>) -> EventDisposition {
		self.bridge.handle(&MessageEvent::new(Arc::clone(sender), message)).await
	}

	fn replies(&mut self) -> Vec<String> {
		let mut texts = Vec::new();
		while let Ok(reply) = self.outbox.try_recv() {
			texts.push(reply.text);
		}
		texts
	}
}

#[rstest]
#[case::plain_chat("hello everyone")]
#[case::unknown_command("/frobnicate now")]
#[case::empty("")]
#[tokio::test]
async fn ordinary_messages_pass_through(#[case] text: &str) {
	let mut h = Harness::new();
	assert_eq!(h.handle(&h.user, text).await, EventDisposition::PassThrough);
	assert!(h.replies().is_empty());
}

#[tokio::test]
async fn message_for_another_bot_passes_through() {
	let mut h = Harness::new();
	let message = RichMessage::new().with(Segment::mention(999)).with(Segment::text(" /echo hi"));

	assert_eq!(h.handle(&h.user, message).await, EventDisposition::PassThrough);
	assert!(h.replies().is_empty());
}

#[tokio::test]
async fn addressed_command_is_intercepted_and_output_replied() {
	let mut h = Harness::new();
	let message = RichMessage::new().with(Segment::mention(123)).with(Segment::text(" /echo hi there"));

	assert_eq!(h.handle(&h.user, message).await, EventDisposition::Intercepted);
	assert_eq!(h.replies(), vec!["hi there".to_owned()]);
}

#[tokio::test]
async fn prefix_optional_command_is_intercepted_without_prefix() {
	let mut h = Harness::new();
	assert_eq!(h.handle(&h.user, "say hello").await, EventDisposition::Intercepted);
	assert_eq!(h.replies(), vec!["hello".to_owned()]);
}

#[tokio::test]
async fn failure_is_reported_to_sender() {
	let mut h = Harness::new();
	assert_eq!(h.handle(&h.user, "/fail").await, EventDisposition::Intercepted);
	assert_eq!(h.replies(), vec!["Command 'fail' failed: disk full".to_owned()]);
}

#[tokio::test]
async fn denied_prefixed_command_replies_denial() {
	let mut h = Harness::new();
	assert_eq!(h.handle(&h.user, "/ban 42").await, EventDisposition::Intercepted);
	assert_eq!(h.replies(), vec!["Permission denied".to_owned()]);
}

#[rstest]
#[case("peek")]
#[case("/peek")]
#[tokio::test]
async fn denied_prefix_optional_command_passes_through_silently(#[case] text: &str) {
	let mut h = Harness::new();
	assert_eq!(h.handle(&h.user, text).await, EventDisposition::PassThrough);
	assert!(h.replies().is_empty());
}

#[rstest]
#[case::configured_operator(8, "Command 'ban' failed: disk full")]
#[case::unlisted_user(9, "Permission denied")]
#[tokio::test]
async fn operator_list_gates_operator_commands(#[case] user: u64, #[case] reply: &str) {
	let mut h = Harness::new();
	let sender = h.chat(user);
	assert_eq!(h.handle(&sender, "/ban 42").await, EventDisposition::Intercepted);
	assert_eq!(h.replies(), vec![reply.to_owned()]);
}

#[tokio::test]
async fn console_is_never_denied() {
	let mut h = Harness::new();
	assert_eq!(h.handle(&h.console, "/ban 42").await, EventDisposition::Intercepted);
	assert_eq!(h.replies(), vec!["Command 'ban' failed: disk full".to_owned()]);
}

#[tokio::test]
async fn listen_forwards_only_pass_through_events() {
	let mut h = Harness::new();
	let (in_tx, in_rx) = mpsc::channel(8);
	let (down_tx, mut down_rx) = mpsc::channel(8);
	let listener = tokio::spawn(Arc::clone(&h.bridge).listen(in_rx, down_tx));

	in_tx.send(MessageEvent::new(h.user.clone(), "/echo one")).await.unwrap();
	in_tx.send(MessageEvent::new(h.user.clone(), "just chatting")).await.unwrap();
	drop(in_tx);
	listener.await.unwrap();

	let forwarded = down_rx.recv().await.unwrap();
	assert_eq!(forwarded.message, RichMessage::text("just chatting"));
	assert_eq!(forwarded.sender.identity(), SenderIdentity::User(UserId(7)));
	assert!(matches!(down_rx.try_recv(), Err(TryRecvError::Disconnected)));
	assert_eq!(h.replies(), vec!["one".to_owned()]);
}

#[tokio::test]
async fn shutdown_cancels_and_drains_in_flight_handlers() {
	let mut h = Harness::new();
	let (in_tx, in_rx) = mpsc::channel(8);
	let (down_tx, _down_rx) = mpsc::channel(8);
	let listener = tokio::spawn(Arc::clone(&h.bridge).listen(in_rx, down_tx));

	in_tx.send(MessageEvent::new(h.user.clone(), "/wait")).await.unwrap();
	tokio::time::sleep(Duration::from_millis(20)).await;
	h.bridge.shutdown();

	tokio::time::timeout(Duration::from_secs(5), listener).await.expect("listener should stop").unwrap();
	assert_eq!(h.replies(), vec!["cancelled".to_owned()]);
	assert!(h.bridge.dispatcher().cancellation().is_cancelled());
}

#[tokio::test]
async fn listen_stops_on_cancellation_with_open_inbound() {
	let h = Harness::new();
	let cancel = CancellationToken::new();
	let bridge = Arc::new(CommandBridge::new(BOT, h.bridge.dispatcher().clone().with_cancellation(cancel.clone())));
	let (_in_tx, in_rx) = mpsc::channel::<MessageEvent>(8);
	let (down_tx, _down_rx) = mpsc::channel(8);

	let listener = tokio::spawn(bridge.listen(in_rx, down_tx));
	cancel.cancel();
	tokio::time::timeout(Duration::from_secs(5), listener).await.expect("listener should stop").unwrap();
}

async fn next_reply(outbox: &mut mpsc::UnboundedReceiver<Reply>) -> String {
	tokio::time::timeout(Duration::from_secs(5), outbox.recv())
		.await
		.expect("reply should arrive")
		.expect("outbox open")
		.text
}

#[tokio::test]
async fn panicking_command_does_not_stall_its_neighbours() {
	let mut h = Harness::new();
	let (in_tx, in_rx) = mpsc::channel(8);
	let (down_tx, _down_rx) = mpsc::channel(8);
	let listener = tokio::spawn(Arc::clone(&h.bridge).listen(in_rx, down_tx));

	for text in ["/wait", "/boom", "/echo after"] {
		in_tx.send(MessageEvent::new(h.user.clone(), text)).await.unwrap();
	}
	let mut replies = vec![next_reply(&mut h.outbox).await, next_reply(&mut h.outbox).await];
	replies.sort();
	assert_eq!(replies, vec!["Command 'boom' failed: command panicked: boom".to_owned(), "after".to_owned()]);
	assert!(!listener.is_finished());

	h.bridge.shutdown();
	tokio::time::timeout(Duration::from_secs(5), listener).await.expect("listener should stop").unwrap();
	assert_eq!(h.replies(), vec!["cancelled".to_owned()]);
}

#[tokio::test]
async fn panicking_reply_path_does_not_stop_listener() {
	let mut h = Harness::new();
	let (in_tx, in_rx) = mpsc::channel(8);
	let (down_tx, _down_rx) = mpsc::channel(8);
	let listener = tokio::spawn(Arc::clone(&h.bridge).listen(in_rx, down_tx));

	in_tx.send(MessageEvent::new(Arc::new(Crashing), "/echo lost")).await.unwrap();
	tokio::time::sleep(Duration::from_millis(20)).await;
	in_tx.send(MessageEvent::new(h.user.clone(), "/echo kept")).await.unwrap();

	assert_eq!(next_reply(&mut h.outbox).await, "kept");
	assert!(!listener.is_finished());

	drop(in_tx);
	tokio::time::timeout(Duration::from_secs(5), listener).await.expect("listener should stop").unwrap();
}
