//! `WM_COPYDATA` transport for [`BridgeMessage`]s.

use std::ffi::c_void;

use sysmenu_core::BridgeMessage;
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::DataExchange::COPYDATASTRUCT;
use windows::Win32::UI::WindowsAndMessaging::{SMTO_ABORTIFHUNG, SendMessageTimeoutW, WM_COPYDATA};

const SEND_TIMEOUT_MS: u32 = 2000;

/// Delivers `message` to `target`, naming `from` as the sender.
pub fn send(from: HWND, target: HWND, message: &BridgeMessage) -> bool {
    let mut payload = message.encode_payload();
    let data = COPYDATASTRUCT {
        dwData: message.tag as usize,
        cbData: payload.len() as u32,
        lpData: payload.as_mut_ptr() as *mut c_void,
    };

    // SAFETY: `data` and `payload` stay alive for the synchronous send;
    // the system copies them into the receiving process.
    let sent = unsafe {
        SendMessageTimeoutW(
            target,
            WM_COPYDATA,
            WPARAM(from.0 as usize),
            LPARAM(&data as *const COPYDATASTRUCT as isize),
            SMTO_ABORTIFHUNG,
            SEND_TIMEOUT_MS,
            None,
        )
    };
    sent.0 != 0
}

/// Reads the tag and payload of a received `WM_COPYDATA`.
///
/// # Safety
///
/// `lparam` must be the `LPARAM` of a `WM_COPYDATA` being handled.
pub unsafe fn receive(lparam: LPARAM) -> Option<(i64, Vec<u8>)> {
    let data = unsafe { (lparam.0 as *const COPYDATASTRUCT).as_ref()? };
    let bytes = if data.lpData.is_null() || data.cbData == 0 {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(data.lpData as *const u8, data.cbData as usize) }.to_vec()
    };
    Some((data.dwData as i64, bytes))
}
