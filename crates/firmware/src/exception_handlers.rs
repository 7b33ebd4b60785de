//! Cortex-M exception hooks.
//!
//! The display and reset pin belong to the board, so the hooks cannot draw
//! themselves. They forward to [`bsod::raise`], and the board's installed
//! fatal handler puts the message on the panel.

use crate::bsod::{self, FatalMessage};

#[cortex_m_rt::exception]
#[allow(unsafe_code)]
unsafe fn HardFault(ef: &cortex_m_rt::ExceptionFrame) -> ! {
    cortex_m::interrupt::disable();
    let msg = FatalMessage::new(format_args!("Hard fault at PC 0x{:08X}", ef.pc()), file!(), line!());
    bsod::raise(&msg)
}
