use std::mem;

use sysmenu_core::{Monitor, Rect};
use windows::Win32::Foundation::{HWND, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITOR_DEFAULTTONEAREST, MONITORINFO,
    MONITORINFOEXW, MonitorFromWindow,
};
use windows::core::BOOL;

use crate::frame::to_rect;

const MONITORINFOF_PRIMARY: u32 = 1;

/// Returns the work area of the monitor containing the given window.
pub fn work_area_for_window(hwnd: HWND) -> Option<Rect> {
    let monitor = unsafe { MonitorFromWindow(hwnd, MONITOR_DEFAULTTONEAREST) };
    info(monitor).map(|m| m.work_area)
}

/// Lists every display monitor, primary flagged.
pub fn enumerate_monitors() -> Vec<Monitor> {
    let mut handles: Vec<HMONITOR> = Vec::new();

    // SAFETY: the callback only pushes into `handles`, which outlives the
    // synchronous enumeration.
    unsafe {
        let _ = EnumDisplayMonitors(
            None,
            None,
            Some(collect_monitor),
            LPARAM(&mut handles as *mut _ as isize),
        );
    }

    handles.into_iter().filter_map(info).collect()
}

unsafe extern "system" fn collect_monitor(monitor: HMONITOR, _: HDC, _: *mut RECT, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Vec passed by enumerate_monitors().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<HMONITOR>) };
    handles.push(monitor);
    BOOL(1)
}

fn info(monitor: HMONITOR) -> Option<Monitor> {
    let mut info = MONITORINFOEXW {
        monitorInfo: MONITORINFO {
            cbSize: mem::size_of::<MONITORINFOEXW>() as u32,
            ..Default::default()
        },
        ..Default::default()
    };

    // SAFETY: cbSize announces the extended struct, so the device name
    // is filled in as well.
    let ok = unsafe { GetMonitorInfoW(monitor, &mut info as *mut MONITORINFOEXW as *mut MONITORINFO) };
    if !ok.as_bool() {
        return None;
    }

    let device = &info.szDevice;
    let len = device.iter().position(|c| *c == 0).unwrap_or(device.len());
    let name = String::from_utf16_lossy(&device[..len]);

    Some(Monitor {
        handle: monitor.0 as usize,
        name: name.trim_start_matches("\\\\.\\").to_string(),
        work_area: to_rect(info.monitorInfo.rcWork),
        primary: info.monitorInfo.dwFlags & MONITORINFOF_PRIMARY != 0,
    })
}
