//! The GUI task.

use gui::{Board, ClientFsm, Gui, GuiError, ScreenCreator};

use crate::bsod::{self, FatalMessage};
use crate::fsm_bridge::FsmBridge;
use crate::fsm_table::fsm_table;
use crate::screens::HomeScreen;

/// Window core wired to the print-control bridge.
///
/// Each [`step`](Self::step) drains the bridge's commands into the GUI, runs
/// one loop tick and hands any answers back through the bridge.
pub struct App<'a> {
    gui: Gui,
    bridge: &'a FsmBridge,
}

impl<'a> App<'a> {
    /// Start on the home screen.
    pub fn new(bridge: &'a FsmBridge) -> Result<Self, GuiError> {
        let gui = Gui::new(ScreenCreator::of::<HomeScreen>(), fsm_table())?;
        Ok(Self { gui, bridge })
    }

    pub fn gui(&self) -> &Gui {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut Gui {
        &mut self.gui
    }

    /// One tick. Errors the window core can shrug off are logged and
    /// dropped; anything else comes back as a fatal message.
    pub fn step<B: Board>(&mut self, board: &mut B) -> Result<(), FatalMessage> {
        pump(&mut self.gui, self.bridge, board).map_err(|err| FatalMessage::from_error(err, file!(), line!()))
    }

    /// Open the dialog for `fsm` and keep stepping until the printer side
    /// destroys it through the bridge. Answers given meanwhile are
    /// forwarded as in [`step`](Self::step).
    pub fn wait_until_closed<B: Board>(&mut self, board: &mut B, fsm: ClientFsm, data: u8) -> Result<(), FatalMessage> {
        let bridge = self.bridge;
        self.gui
            .wait_until_closed_with(board, fsm, data, |gui, board| pump(gui, bridge, board))
            .or_else(shrug)
            .map_err(|err| FatalMessage::from_error(err, file!(), line!()))
    }

    /// Run forever, escalating the first fatal error.
    pub fn run<B: Board>(mut self, board: &mut B) -> ! {
        loop {
            if let Err(msg) = self.step(board) {
                bsod::raise(&msg);
            }
        }
    }
}

// Bridge commands in, one loop tick, answers out.
fn pump<B: Board>(gui: &mut Gui, bridge: &FsmBridge, board: &mut B) -> Result<(), GuiError> {
    let result = tick(gui, bridge, board);
    while let Some(response) = gui.take_response() {
        bridge.push_response(response);
    }
    result.or_else(shrug)
}

fn tick<B: Board>(gui: &mut Gui, bridge: &FsmBridge, board: &mut B) -> Result<(), GuiError> {
    while let Some(command) = bridge.poll() {
        gui.handle_fsm(command, board.prefs())?;
    }
    gui.loop_once(board)
}

fn shrug(err: GuiError) -> Result<(), GuiError> {
    if !err.is_recoverable() {
        return Err(err);
    }
    #[cfg(feature = "defmt")]
    defmt::warn!("gui: {}", err);
    #[cfg(feature = "tracing")]
    tracing::warn!("gui: {}", err);
    Ok(())
}
