use crate::cli_handlers::utils::ClientContext;
use crate::display::render_systems;
use crate::error::Result;
use crate::registry::{RegistryChange, SharedRegistry, SystemRegistry};
use crate::ws_client::{follow, socket_url};
use std::io::IsTerminal;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

const CLEAR_SCREEN: &str = "\x1B[2J\x1B[H";

/// `garden watch`: redraw the system list whenever the registry changes.
pub async fn handle_watch_command(all: bool) -> Result<()> {
    let ctx = ClientContext::load().await?;
    let address = ctx.api.address().map(str::to_string);

    // Reject a missing or unusable address before spawning the transport
    socket_url(address.as_deref())?;

    let registry = SystemRegistry::shared();
    let changes = registry.read().await.subscribe();
    let transport = tokio::spawn(follow(address.clone(), registry.clone()));

    let clear = std::io::stdout().is_terminal();
    println!("Waiting for {}...", address.as_deref().unwrap_or_default());

    watch_changes(&registry, changes, transport, |current| {
        if clear {
            print!("{}", CLEAR_SCREEN);
        }
        print!(
            "{}",
            render_frame(current, all, &chrono::Local::now().format("%H:%M:%S").to_string())
        );
    })
    .await
}

/// Call `redraw` after every registry change until the transport task ends.
///
/// A lagging receiver still redraws: the registry holds the latest state, so
/// skipped notifications lose nothing.
pub async fn watch_changes<F>(
    registry: &SharedRegistry,
    mut changes: broadcast::Receiver<RegistryChange>,
    mut transport: JoinHandle<Result<()>>,
    mut redraw: F,
) -> Result<()>
where
    F: FnMut(&SystemRegistry),
{
    loop {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(change) => tracing::debug!(?change, "Registry changed"),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!("Display skipped {} registry changes", skipped)
                },
                Err(RecvError::Closed) => break,
            },
            joined = &mut transport => {
                joined.map_err(anyhow::Error::from)??;
                break;
            },
        }

        redraw(&*registry.read().await);
    }

    Ok(())
}

/// One screenful: a header line followed by the system table.
pub fn render_frame(registry: &SystemRegistry, all: bool, updated: &str) -> String {
    format!(
        "Garden systems ({}) - updated {}\n\n{}",
        registry.len(),
        updated,
        render_systems(registry.systems(), all)
    )
}
