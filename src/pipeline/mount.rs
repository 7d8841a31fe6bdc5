//! Mount API - Application lifecycle and render effect.
//!
//! Wires the greeter state, the name input and the renderer together:
//!
//! ```text
//! name / cursor / greeting / terminal size → frame derived → render effect
//! ```
//!
//! [`Screen`] is the terminal-independent part (state, event routing, render
//! effect into any writer). [`mount`] puts a `Screen` on the real terminal.
//!
//! # Example
//!
//! ```ignore
//! use spark_greeter::pipeline::mount;
//!
//! let handle = mount::mount(client)?;
//! mount::run(&handle)?;  // Blocks until Esc / Ctrl+C
//! handle.unmount();
//! ```

use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossterm::cursor::Show;
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use spark_signals::{derived, effect, flush_sync};

use super::frame::compose_frame;
use super::terminal::{
    detect_terminal_size, set_terminal_size, terminal_height_signal, terminal_width_signal,
};
use crate::net::GreetingClient;
use crate::primitives::TextInput;
use crate::renderer::DiffRenderer;
use crate::state::input::{InputEvent, poll_event};
use crate::state::keyboard::{Command, command_for};
use crate::state::Greeter;

/// How long one tick waits for input (~60fps).
pub const TICK: Duration = Duration::from_millis(16);

// =============================================================================
// Screen
// =============================================================================

/// Greeter state, name input and the render effect, minus the terminal.
pub struct Screen {
    greeter: Greeter,
    input: TextInput,
    running: Arc<AtomicBool>,
    stop_render: Option<Box<dyn FnOnce()>>,
}

impl Screen {
    /// Build the screen and start rendering into `target`.
    ///
    /// The render effect runs once immediately, drawing the empty form.
    pub fn new<W: Write + 'static>(client: Arc<dyn GreetingClient>, target: W) -> Self {
        let greeter = Greeter::new(client);
        let input = TextInput::new(greeter.name_signal());
        let running = Arc::new(AtomicBool::new(true));

        let stop_render = install_render_effect(&greeter, &input, target, running.clone());

        Self {
            greeter,
            input,
            running,
            stop_render: Some(stop_render),
        }
    }

    pub fn greeter(&self) -> &Greeter {
        &self.greeter
    }

    pub fn input(&self) -> &TextInput {
        &self.input
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request shutdown; the next tick returns false.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Route one input event. Returns true if it changed anything.
    pub fn route_event(&self, event: InputEvent) -> bool {
        match event {
            InputEvent::Key(key) => match command_for(&key) {
                Some(Command::Quit) => {
                    tracing::info!("quit requested");
                    self.stop();
                    true
                }
                Some(command) => self.input.apply(command),
                None => false,
            },
            InputEvent::Paste(text) => self.input.insert_str(&text),
            InputEvent::Resize(width, height) => {
                set_terminal_size(width, height);
                true
            }
            InputEvent::None => false,
        }
    }

    /// Apply any greeting responses that have arrived.
    pub fn pump(&self) -> usize {
        let applied = self.greeter.poll_resolutions();
        flush_sync();
        applied
    }

    fn stop_render(&mut self) {
        if let Some(stop) = self.stop_render.take() {
            stop();
        }
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        self.stop_render();
    }
}

/// Create the frame derived and the ONE render effect.
fn install_render_effect<W: Write + 'static>(
    greeter: &Greeter,
    input: &TextInput,
    mut target: W,
    running: Arc<AtomicBool>,
) -> Box<dyn FnOnce()> {
    let name = greeter.name_signal();
    let greeting = greeter.greeting_signal();
    let cursor = input.cursor_signal();
    let width = terminal_width_signal();
    let height = terminal_height_signal();

    let width_for_frame = width.clone();
    let height_for_frame = height.clone();
    let frame = derived(move || {
        let name = name.get();
        let cursor = cursor.get().min(name.chars().count());
        compose_frame(
            &name,
            cursor,
            &greeting.get(),
            width_for_frame.get(),
            height_for_frame.get(),
        )
    });

    let mut renderer = DiffRenderer::new();
    let mut last_size: Option<(u16, u16)> = None;

    let stop = effect(move || {
        if !running.load(Ordering::SeqCst) {
            return;
        }

        // Rows from a differently sized screen cannot be diffed against
        let size = (width.get(), height.get());
        if last_size != Some(size) {
            renderer.invalidate();
            let _ = execute!(target, Clear(ClearType::All));
            last_size = Some(size);
        }

        let frame = frame.get();
        if let Err(err) = renderer.render(&frame, &mut target) {
            tracing::warn!(error = %err, "render failed");
        }
    });

    Box::new(stop)
}

// =============================================================================
// Mount Handle
// =============================================================================

/// Restores the terminal when dropped.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let guard = Self;
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

/// Handle returned by mount() that allows unmounting.
pub struct MountHandle {
    // Field order matters: the screen (and its render effect) goes before
    // the terminal is restored.
    screen: Screen,
    _terminal: TerminalGuard,
}

impl MountHandle {
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn is_running(&self) -> bool {
        self.screen.is_running()
    }

    /// Stop the application (sets running to false).
    pub fn stop(&self) {
        self.screen.stop();
    }

    /// Stop rendering and restore the terminal.
    pub fn unmount(self) {
        self.screen.stop();
        drop(self);
        tracing::info!("unmounted");
    }
}

// =============================================================================
// Mount Function
// =============================================================================

/// Mount the greeter on the terminal.
///
/// This sets up:
/// 1. Terminal size detection
/// 2. Raw mode, alternate screen, bracketed paste
/// 3. Greeter state, name input and the render effect
pub fn mount(client: Arc<dyn GreetingClient>) -> io::Result<MountHandle> {
    detect_terminal_size();
    let terminal = TerminalGuard::enter()?;
    let screen = Screen::new(client, io::stdout());
    tracing::info!("mounted");

    Ok(MountHandle {
        screen,
        _terminal: terminal,
    })
}

/// Unmount and clean up.
pub fn unmount(handle: MountHandle) {
    handle.unmount();
}

// =============================================================================
// Event Loop
// =============================================================================

/// Run the event loop once.
///
/// Waits up to [`TICK`] for input, routes it, then applies any greeting
/// responses that arrived meanwhile.
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Stop requested (Esc, Ctrl+C or `handle.stop()`)
/// * `Err(e)` - I/O error while polling
pub fn tick(handle: &MountHandle) -> io::Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if let Some(event) = poll_event(TICK)? {
        handle.screen.route_event(event);
    }
    handle.screen.pump();

    Ok(handle.is_running())
}

/// Run the event loop (blocking until stopped).
pub fn run(handle: &MountHandle) -> io::Result<()> {
    while tick(handle)? {}
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
