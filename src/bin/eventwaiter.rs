use clap::Parser;
use eventwaiter::{
    config::{self, WaiterConfig},
    event::{ActorId, ArtifactId, ChannelId, Event, EventBus, WaitRegistry},
    menu::{
        ArtifactSink, Content, Continuation, InteractionSettings, Menu, MenuContext, Paginator,
        PaginatorConfig,
    },
    testing::StaticRoles,
    Error,
};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::Notify,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Number of demo items to paginate
    #[arg(short, long, default_value_t = 25)]
    items: usize,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

/// Prints artifacts to stdout instead of sending them anywhere.
#[derive(Default)]
struct ConsoleSink {
    next_id: AtomicUsize,
}

impl ConsoleSink {
    fn print(artifact: &ArtifactId, content: &Content) {
        println!("── {} ──", artifact);
        if let Some(text) = &content.text {
            println!("{}", text);
        }
        if let Some(title) = &content.title {
            println!("# {}", title);
        }
        println!("{}", content.description);
        if let Some(footer) = &content.footer {
            println!("[{}]", footer);
        }
    }
}

impl ArtifactSink for ConsoleSink {
    fn send(&self, _channel: &ChannelId, content: Content, then: Continuation<ArtifactId>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let artifact = ArtifactId::new(format!("message-{id}"));
        Self::print(&artifact, &content);
        then(artifact);
    }

    fn edit(&self, artifact: &ArtifactId, content: Content) {
        Self::print(artifact, &content);
    }

    fn add_reactions(&self, _artifact: &ArtifactId, emojis: Vec<String>, then: Continuation<()>) {
        println!("buttons: {}", emojis.join(" "));
        then(());
    }

    fn remove_reaction(&self, _artifact: &ArtifactId, _actor: &ActorId, _emoji: &str) {}

    fn clear_reactions(&self, artifact: &ArtifactId) {
        debug!(%artifact, "Reactions cleared");
    }

    fn delete(&self, artifact: &ArtifactId) {
        println!("── {} deleted ──", artifact);
    }
}

async fn run(cli: &Cli) -> Result<(), Error> {
    let config: WaiterConfig = if cli.config.exists() {
        config::from_file(&cli.config)?
    } else {
        WaiterConfig::default()
    };
    info!("config loaded.");
    debug!("config: {:?}", config);

    let waiter = WaitRegistry::<Event>::with_tokio()?;
    let bus = EventBus::new(config.event_buffer_size);
    let listener = {
        let waiter = waiter.clone();
        let receiver = bus.subscribe();
        tokio::spawn(async move { waiter.listen(receiver).await })
    };

    let ctx = MenuContext::new(
        waiter.clone(),
        Arc::new(ConsoleSink::default()),
        Arc::new(StaticRoles::new()),
    );
    let channel = ChannelId::new("console");
    let actor = ActorId::new("console");

    let finished = Arc::new(Notify::new());
    let notify = finished.clone();
    let paginator = Paginator::new(
        InteractionSettings::from(&config.menu),
        PaginatorConfig {
            title: Some("Demo items".to_string()),
            number_items: true,
            allow_text_input: true,
            left_text: Some("prev".to_string()),
            right_text: Some("next".to_string()),
            ..PaginatorConfig::from(&config.menu)
        }
        .items((1..=cli.items).map(|i| format!("Item {i}")))
        .on_final(move |_, page| {
            println!("Finished on page {}.", page);
            notify.notify_one();
        }),
    )?;
    let handle = paginator.display(&ctx, &channel);

    println!("Type a page number, 'prev' or 'next', or '+<emoji>' to press a button.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            _ = finished.notified() => break,
            line = lines.next_line() => line
                .map_err(|e| Error::internal(format!("Failed to read stdin: {}", e)))?,
        };
        let Some(line) = line else {
            break;
        };
        let event = match (line.strip_prefix('+'), handle.artifact()) {
            (Some(emoji), Some(artifact)) => {
                Event::reaction(artifact, channel.clone(), actor.clone(), emoji.trim())
            }
            _ => Event::message(
                ArtifactId::new("typed"),
                channel.clone(),
                actor.clone(),
                &line,
            ),
        };
        bus.publish(event).await?;
    }

    handle.cancel();
    bus.publish(Event::Shutdown).await?;
    let matched = listener
        .await
        .map_err(|e| Error::internal(format!("Listener task failed: {}", e)))?;
    info!(matched, "Shut down");

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
