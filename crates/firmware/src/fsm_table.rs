//! Which dialog or screen each FSM opens.

use gui::{ClientFsm, DialogFactory, FsmHandler, ScreenCreator};

use crate::screens::{FirstLayerScreen, PrintingScreen, SERIAL_PRINTING};

/// The complete dispatch table: the standard overlay dialogs plus this
/// firmware's full-screen views.
pub fn fsm_table() -> DialogFactory {
    DialogFactory::with_standard_dialogs()
        .with(
            ClientFsm::Printing,
            FsmHandler::FullScreen(ScreenCreator::of::<PrintingScreen>()),
        )
        .with(
            ClientFsm::SerialPrinting,
            FsmHandler::FullScreen(ScreenCreator::with_arg::<PrintingScreen>(SERIAL_PRINTING)),
        )
        .with(
            ClientFsm::FirstLayer,
            FsmHandler::FullScreen(ScreenCreator::of::<FirstLayerScreen>()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use gui::HandlerKind;

    #[test]
    fn test_table_is_complete() {
        assert_eq!(fsm_table().validate(), Ok(()));
    }

    #[test]
    fn test_printing_fsms_are_full_screen() {
        let table = fsm_table();
        for fsm in [ClientFsm::Printing, ClientFsm::SerialPrinting, ClientFsm::FirstLayer] {
            assert_eq!(table.handler(fsm).map(|h| h.kind()), Some(HandlerKind::FullScreen));
        }
        assert_eq!(
            table.handler(ClientFsm::LoadUnload).map(|h| h.kind()),
            Some(HandlerKind::Overlay)
        );
    }

    #[test]
    fn test_serial_and_normal_printing_differ() {
        let table = fsm_table();
        let (Some(FsmHandler::FullScreen(a)), Some(FsmHandler::FullScreen(b))) =
            (table.handler(ClientFsm::Printing), table.handler(ClientFsm::SerialPrinting))
        else {
            panic!("printing handlers missing");
        };
        assert_ne!(a, b);
        assert!(a.builds::<PrintingScreen>() && b.builds::<PrintingScreen>());
    }
}
