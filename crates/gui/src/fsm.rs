//! The conversation protocol between print-control code and the display.
//!
//! The printer side announces long-running operations as finite state
//! machines: it creates one, reports phase changes, and destroys it. The
//! GUI shows a matching dialog or screen and answers with
//! [`PhaseResponse`]s when the user presses a button.
//!
//! Commands cross from the printer side through an [`FsmQueue`] that keeps
//! at most one create, one change and one destroy. Newer information
//! replaces older information, so the queue never needs to grow.

use heapless::Deque;

use crate::config::RESPONSE_QUEUE_DEPTH;

/// Every state machine the printer can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)] // variant names are the protocol names
pub enum ClientFsm {
    SerialPrinting,
    LoadUnload,
    Preheat,
    Selftest,
    NetworkSetup,
    Printing,
    CrashRecovery,
    QuickPause,
    Warning,
    PrintPreview,
    ColdPull,
    PhaseStepping,
    InputShaperCalibration,
    FirstLayer,
}

impl ClientFsm {
    /// Number of variants.
    pub const COUNT: usize = 14;

    /// All variants in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::SerialPrinting,
        Self::LoadUnload,
        Self::Preheat,
        Self::Selftest,
        Self::NetworkSetup,
        Self::Printing,
        Self::CrashRecovery,
        Self::QuickPause,
        Self::Warning,
        Self::PrintPreview,
        Self::ColdPull,
        Self::PhaseStepping,
        Self::InputShaperCalibration,
        Self::FirstLayer,
    ];

    /// Position in [`ClientFsm::ALL`].
    pub fn index(self) -> usize {
        usize::from(self as u8)
    }

    /// Inverse of [`ClientFsm::index`].
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SerialPrinting => "SerialPrinting",
            Self::LoadUnload => "LoadUnload",
            Self::Preheat => "Preheat",
            Self::Selftest => "Selftest",
            Self::NetworkSetup => "NetworkSetup",
            Self::Printing => "Printing",
            Self::CrashRecovery => "CrashRecovery",
            Self::QuickPause => "QuickPause",
            Self::Warning => "Warning",
            Self::PrintPreview => "PrintPreview",
            Self::ColdPull => "ColdPull",
            Self::PhaseStepping => "PhaseStepping",
            Self::InputShaperCalibration => "InputShaperCalibration",
            Self::FirstLayer => "FirstLayer",
        }
    }

    /// Human-readable title shown in dialog headers.
    pub fn title(self) -> &'static str {
        match self {
            Self::SerialPrinting => "Serial printing",
            Self::LoadUnload => "Filament",
            Self::Preheat => "Preheat",
            Self::Selftest => "Selftest",
            Self::NetworkSetup => "Network setup",
            Self::Printing => "Printing",
            Self::CrashRecovery => "Crash recovery",
            Self::QuickPause => "Paused",
            Self::Warning => "Warning",
            Self::PrintPreview => "Print preview",
            Self::ColdPull => "Cold pull",
            Self::PhaseStepping => "Phase stepping",
            Self::InputShaperCalibration => "Input shaper",
            Self::FirstLayer => "First layer",
        }
    }
}

/// Four opaque bytes of phase payload; meaning depends on the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseData(pub [u8; 4]);

/// Phase index plus payload, as carried by a change command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BaseData {
    pub phase: u8,
    pub data: PhaseData,
}

impl BaseData {
    pub const fn new(phase: u8, data: PhaseData) -> Self {
        Self { phase, data }
    }
}

/// Progress payload: done and total units, little-endian `u16`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressData {
    pub current: u16,
    pub total: u16,
}

impl ProgressData {
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = u32::from(self.current.min(self.total)).saturating_mul(100) / u32::from(self.total);
        u8::try_from(percent).unwrap_or(100)
    }
}

impl From<PhaseData> for ProgressData {
    fn from(data: PhaseData) -> Self {
        let [c0, c1, t0, t1] = data.0;
        Self {
            current: u16::from_le_bytes([c0, c1]),
            total: u16::from_le_bytes([t0, t1]),
        }
    }
}

impl From<ProgressData> for PhaseData {
    fn from(progress: ProgressData) -> Self {
        let [c0, c1] = progress.current.to_le_bytes();
        let [t0, t1] = progress.total.to_le_bytes();
        Self([c0, c1, t0, t1])
    }
}

/// One command from the printer side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsmCommand {
    /// Open the dialog or screen for `fsm`. `data` selects a variant.
    Create { fsm: ClientFsm, data: u8 },
    /// Phase or progress update.
    Change { fsm: ClientFsm, data: BaseData },
    /// Close it again.
    Destroy { fsm: ClientFsm },
}

impl FsmCommand {
    pub fn fsm(self) -> ClientFsm {
        match self {
            Self::Create { fsm, .. } | Self::Change { fsm, .. } | Self::Destroy { fsm } => fsm,
        }
    }

    fn is_create(&self) -> bool {
        matches!(self, Self::Create { .. })
    }

    fn is_destroy(&self) -> bool {
        matches!(self, Self::Destroy { .. })
    }
}

/// Coalescing command queue between the printer side and the GUI.
///
/// Holds at most `[destroy] [create] [change]`, in that order:
///
/// - a second create is refused;
/// - a change overwrites a queued change of the same FSM and is refused
///   while a change of another FSM is waiting;
/// - a destroy wipes everything queued after an earlier destroy, cancels a
///   queued create outright, and otherwise replaces the queue.
#[derive(Debug, Default)]
pub struct FsmQueue {
    items: Deque<FsmCommand, 3>,
}

impl FsmQueue {
    pub const fn new() -> Self {
        Self { items: Deque::new() }
    }

    /// Queue a create. Returns `false` if refused.
    pub fn push_create(&mut self, fsm: ClientFsm, data: u8) -> bool {
        if self.items.iter().any(FsmCommand::is_create) {
            return false;
        }
        self.items.push_back(FsmCommand::Create { fsm, data }).is_ok()
    }

    /// Queue a change. Returns `false` if refused.
    pub fn push_change(&mut self, fsm: ClientFsm, data: BaseData) -> bool {
        if let Some(FsmCommand::Change { fsm: queued, data: slot }) = self.items.back_mut() {
            if *queued != fsm {
                return false;
            }
            *slot = data;
            return true;
        }
        self.items.push_back(FsmCommand::Change { fsm, data }).is_ok()
    }

    /// Queue a destroy. Returns `false` when an earlier destroy is kept
    /// instead.
    pub fn push_destroy(&mut self, fsm: ClientFsm) -> bool {
        if let Some(pos) = self.items.iter().position(FsmCommand::is_destroy) {
            while self.items.len() > pos.saturating_add(1) {
                self.items.pop_back();
            }
            return false;
        }
        if self.items.iter().any(FsmCommand::is_create) {
            // create + destroy cancel out
            self.items.clear();
            return true;
        }
        self.items.clear();
        self.items.push_back(FsmCommand::Destroy { fsm }).is_ok()
    }

    pub fn pop(&mut self) -> Option<FsmCommand> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&FsmCommand> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Queued commands, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FsmCommand> + '_ {
        self.items.iter()
    }
}

/// Button answers a dialog can send back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(missing_docs)] // see `label`
pub enum Response {
    Continue,
    Stop,
    Retry,
    Abort,
    Yes,
    No,
    Ok,
    Skip,
    Pause,
    Resume,
}

impl Response {
    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Continue => "CONTINUE",
            Self::Stop => "STOP",
            Self::Retry => "RETRY",
            Self::Abort => "ABORT",
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Ok => "OK",
            Self::Skip => "SKIP",
            Self::Pause => "PAUSE",
            Self::Resume => "RESUME",
        }
    }
}

/// Answer to the phase an FSM was in when the user pressed a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhaseResponse {
    pub fsm: ClientFsm,
    pub phase: u8,
    pub response: Response,
}

/// Answers waiting for the printer side. Oldest answers are dropped first.
#[derive(Debug, Default)]
pub struct ResponseQueue {
    items: Deque<PhaseResponse, RESPONSE_QUEUE_DEPTH>,
}

impl ResponseQueue {
    pub const fn new() -> Self {
        Self { items: Deque::new() }
    }

    pub fn push(&mut self, response: PhaseResponse) {
        if self.items.is_full() {
            gui_warn!("response queue full, dropping the oldest");
            self.items.pop_front();
        }
        let _ = self.items.push_back(response);
    }

    pub fn pop(&mut self) -> Option<PhaseResponse> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(fsm: ClientFsm, phase: u8) -> (ClientFsm, BaseData) {
        (fsm, BaseData::new(phase, PhaseData::default()))
    }

    fn contents(q: &FsmQueue) -> std::vec::Vec<FsmCommand> {
        q.iter().copied().collect()
    }

    #[test]
    fn test_index_round_trip_all() {
        for (i, fsm) in ClientFsm::ALL.iter().enumerate() {
            assert_eq!(fsm.index(), i);
            assert_eq!(ClientFsm::from_index(i), Some(*fsm));
        }
        assert_eq!(ClientFsm::from_index(ClientFsm::COUNT), None);
    }

    #[test]
    fn test_max_queue_length() {
        let mut q = FsmQueue::new();
        assert!(q.push_destroy(ClientFsm::LoadUnload));
        assert!(q.push_create(ClientFsm::Preheat, 0));
        let (fsm, d) = change(ClientFsm::Preheat, 1);
        assert!(q.push_change(fsm, d));
        assert_eq!(q.len(), 3);

        let (fsm, d) = change(ClientFsm::Preheat, 2);
        assert!(q.push_change(fsm, d));
        assert!(!q.push_create(ClientFsm::LoadUnload, 0));
        assert_eq!(q.len(), 3);
        assert_eq!(
            q.iter().last(),
            Some(&FsmCommand::Change {
                fsm: ClientFsm::Preheat,
                data: BaseData::new(2, PhaseData::default())
            })
        );
    }

    #[test]
    fn test_change_of_other_fsm_refused() {
        let mut q = FsmQueue::new();
        let (fsm, d) = change(ClientFsm::Preheat, 1);
        assert!(q.push_change(fsm, d));
        let (fsm, d) = change(ClientFsm::LoadUnload, 1);
        assert!(!q.push_change(fsm, d));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_second_create_refused() {
        let mut q = FsmQueue::new();
        assert!(q.push_create(ClientFsm::Preheat, 0));
        assert!(!q.push_create(ClientFsm::Preheat, 0));
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn test_destroy_keeps_earlier_destroy_only() {
        let mut q = FsmQueue::new();
        q.push_destroy(ClientFsm::LoadUnload);
        q.push_create(ClientFsm::Preheat, 0);
        let (fsm, d) = change(ClientFsm::Preheat, 1);
        q.push_change(fsm, d);

        assert!(!q.push_destroy(ClientFsm::Preheat));
        assert_eq!(contents(&q), [FsmCommand::Destroy { fsm: ClientFsm::LoadUnload }]);
    }

    #[test]
    fn test_destroy_cancels_create() {
        let mut q = FsmQueue::new();
        q.push_create(ClientFsm::Preheat, 0);
        let (fsm, d) = change(ClientFsm::Preheat, 1);
        q.push_change(fsm, d);
        assert!(q.push_destroy(ClientFsm::Preheat));
        assert!(q.is_empty());
    }

    #[test]
    fn test_destroy_replaces_change() {
        let mut q = FsmQueue::new();
        let (fsm, d) = change(ClientFsm::LoadUnload, 3);
        q.push_change(fsm, d);
        assert!(q.push_destroy(ClientFsm::LoadUnload));
        assert_eq!(contents(&q), [FsmCommand::Destroy { fsm: ClientFsm::LoadUnload }]);
    }

    #[test]
    fn test_progress_payload() {
        let progress = ProgressData { current: 300, total: 1200 };
        let data = PhaseData::from(progress);
        assert_eq!(data.0, [0x2c, 0x01, 0xb0, 0x04]);
        assert_eq!(ProgressData::from(data).percent(), 25);
    }

    #[test]
    fn test_progress_percent_edges() {
        assert_eq!(ProgressData { current: 5, total: 0 }.percent(), 0);
        assert_eq!(ProgressData { current: 9, total: 3 }.percent(), 100);
        assert_eq!(ProgressData { current: u16::MAX, total: u16::MAX }.percent(), 100);
    }

    #[test]
    fn test_response_queue_drops_oldest() {
        let mut q = ResponseQueue::new();
        for phase in 0..=RESPONSE_QUEUE_DEPTH as u8 {
            q.push(PhaseResponse {
                fsm: ClientFsm::LoadUnload,
                phase,
                response: Response::Continue,
            });
        }
        assert_eq!(q.len(), RESPONSE_QUEUE_DEPTH);
        assert_eq!(q.pop().map(|r| r.phase), Some(1));
    }
}
