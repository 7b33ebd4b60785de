//! Bridge between the print-control task and the GUI task.
//!
//! The print-control side calls [`fsm_create`], [`fsm_change`] and
//! [`fsm_destroy`] from its own context. They only touch the coalescing
//! queue inside a short critical section: no allocation, no waiting. The
//! GUI task drains the queue once per tick through [`FsmBridge::poll`].
//!
//! Answers flow the other way: the GUI pushes [`PhaseResponse`]s, the
//! print-control side picks them up with [`FsmBridge::take_response`].

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use gui::fsm::{ProgressData, ResponseQueue};
use gui::{BaseData, ClientFsm, FsmCommand, FsmQueue, PhaseData, PhaseResponse};

// CriticalSectionRawMutex: the print-control task may preempt the GUI task,
// and every operation below is a handful of instructions on a fixed-size
// queue, so masking interrupts for its duration is harmless.

/// Command and response queues shared by the two tasks.
pub struct FsmBridge {
    commands: Mutex<CriticalSectionRawMutex, RefCell<FsmQueue>>,
    responses: Mutex<CriticalSectionRawMutex, RefCell<ResponseQueue>>,
}

impl FsmBridge {
    /// Empty bridge, usable in a `static`.
    pub const fn new() -> Self {
        Self {
            commands: Mutex::new(RefCell::new(FsmQueue::new())),
            responses: Mutex::new(RefCell::new(ResponseQueue::new())),
        }
    }

    /// Queue a create. Returns `false` if the queue refused it.
    pub fn create(&self, fsm: ClientFsm, data: u8) -> bool {
        self.commands.lock(|q| q.borrow_mut().push_create(fsm, data))
    }

    /// Queue a phase change with raw payload.
    pub fn change(&self, fsm: ClientFsm, data: BaseData) -> bool {
        self.commands.lock(|q| q.borrow_mut().push_change(fsm, data))
    }

    /// Queue a phase change carrying progress.
    pub fn change_progress(&self, fsm: ClientFsm, phase: u8, total: u16, current: u16) -> bool {
        let data = PhaseData::from(ProgressData { current, total });
        self.change(fsm, BaseData::new(phase, data))
    }

    /// Queue a destroy.
    pub fn destroy(&self, fsm: ClientFsm) -> bool {
        self.commands.lock(|q| q.borrow_mut().push_destroy(fsm))
    }

    /// Oldest queued command, for the GUI task.
    pub fn poll(&self) -> Option<FsmCommand> {
        self.commands.lock(|q| q.borrow_mut().pop())
    }

    /// Number of commands waiting.
    pub fn pending(&self) -> usize {
        self.commands.lock(|q| q.borrow().len())
    }

    /// Hand an answer to the print-control side.
    pub fn push_response(&self, response: PhaseResponse) {
        self.responses.lock(|q| q.borrow_mut().push(response));
    }

    /// Oldest answer from the GUI, for the print-control side.
    pub fn take_response(&self) -> Option<PhaseResponse> {
        self.responses.lock(|q| q.borrow_mut().pop())
    }
}

impl Default for FsmBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// The bridge the print-control callbacks write to.
pub static FSM_BRIDGE: FsmBridge = FsmBridge::new();

/// Print-control callback: open the dialog or screen for `fsm`.
pub fn fsm_create(fsm: ClientFsm, data: u8) {
    if !FSM_BRIDGE.create(fsm, data) {
        #[cfg(feature = "defmt")]
        defmt::warn!("fsm_create dropped: a create is already queued");
    }
}

/// Print-control callback: new phase and progress for `fsm`.
pub fn fsm_change(fsm: ClientFsm, phase: u8, total: u16, current: u16) {
    if !FSM_BRIDGE.change_progress(fsm, phase, total, current) {
        #[cfg(feature = "defmt")]
        defmt::debug!("fsm_change dropped: another FSM's change is queued");
    }
}

/// Print-control callback: close whatever `fsm` opened.
pub fn fsm_destroy(fsm: ClientFsm) {
    FSM_BRIDGE.destroy(fsm);
}
