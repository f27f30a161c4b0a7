use std::mem;

use sysmenu_core::ProcessInfo;
use sysmenu_core::menu_id::Priority;
use windows::Win32::Foundation::{CloseHandle, HANDLE, HWND};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, TH32CS_SNAPTHREAD, THREADENTRY32, Thread32First, Thread32Next,
};
use windows::Win32::System::Threading::{
    ABOVE_NORMAL_PRIORITY_CLASS, BELOW_NORMAL_PRIORITY_CLASS, GetCurrentProcess, GetPriorityClass,
    HIGH_PRIORITY_CLASS, IDLE_PRIORITY_CLASS, IsWow64Process, NORMAL_PRIORITY_CLASS, OpenProcess,
    OpenThread, PROCESS_ACCESS_RIGHTS, PROCESS_CREATION_FLAGS, PROCESS_NAME_WIN32,
    PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_SET_INFORMATION, PROCESS_TERMINATE,
    QueryFullProcessImageNameW, REALTIME_PRIORITY_CLASS, ResumeThread, SetPriorityClass,
    SuspendThread, THREAD_SUSPEND_RESUME, TerminateProcess,
};
use windows::Win32::UI::WindowsAndMessaging::GetWindowThreadProcessId;
use windows::core::{BOOL, PWSTR};

/// A process or thread handle closed on drop.
struct Owned(HANDLE);

impl Drop for Owned {
    fn drop(&mut self) {
        // SAFETY: the handle was opened by us and is closed exactly once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

fn open(pid: u32, access: PROCESS_ACCESS_RIGHTS) -> Option<Owned> {
    // SAFETY: OpenProcess has no preconditions; failure is an Err.
    unsafe { OpenProcess(access, false, pid) }.ok().map(Owned)
}

/// Checks whether a process with the given PID is still alive.
///
/// Used to detect stale PID files left behind when the host is killed
/// without a clean shutdown.
pub fn is_process_alive(pid: u32) -> bool {
    open(pid, PROCESS_QUERY_LIMITED_INFORMATION).is_some()
}

/// The process owning a window, with its image path when readable.
pub fn process_of_window(hwnd: HWND) -> Option<ProcessInfo> {
    let mut pid = 0u32;
    // SAFETY: writes the owning PID into our local.
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut pid)) };
    (pid != 0).then(|| ProcessInfo {
        pid,
        path: image_path(pid),
    })
}

/// Full Win32 path of the process image.
pub fn image_path(pid: u32) -> Option<String> {
    let process = open(pid, PROCESS_QUERY_LIMITED_INFORMATION)?;
    let mut buffer = [0u16; 1024];
    let mut len = buffer.len() as u32;
    // SAFETY: `len` carries the buffer capacity in and the written length out.
    unsafe {
        QueryFullProcessImageNameW(process.0, PROCESS_NAME_WIN32, PWSTR(buffer.as_mut_ptr()), &mut len).ok()?;
    }
    Some(String::from_utf16_lossy(&buffer[..len as usize]))
}

fn is_wow64(process: HANDLE) -> Option<bool> {
    let mut wow64 = BOOL(0);
    // SAFETY: writes into our local BOOL.
    unsafe { IsWow64Process(process, &mut wow64).ok()? };
    Some(wow64.as_bool())
}

/// Whether this host is a 32-bit process on a 64-bit Windows.
pub fn host_is_wow64() -> bool {
    // SAFETY: the pseudo handle needs no closing.
    is_wow64(unsafe { GetCurrentProcess() }).unwrap_or(false)
}

/// Whether the operating system is 64-bit.
pub fn os_is_64bit() -> bool {
    cfg!(target_pointer_width = "64") || host_is_wow64()
}

/// Whether `pid` runs with the same pointer width as this host.
///
/// Processes that cannot be opened are treated as a mismatch.
pub fn matches_host_bitness(pid: u32) -> bool {
    let Some(process) = open(pid, PROCESS_QUERY_LIMITED_INFORMATION) else {
        return false;
    };
    let Some(wow64) = is_wow64(process.0) else {
        return false;
    };
    let process_is_64 = os_is_64bit() && !wow64;
    process_is_64 == cfg!(target_pointer_width = "64")
}

const PRIORITY_CLASSES: [(Priority, PROCESS_CREATION_FLAGS); 6] = [
    (Priority::RealTime, REALTIME_PRIORITY_CLASS),
    (Priority::High, HIGH_PRIORITY_CLASS),
    (Priority::AboveNormal, ABOVE_NORMAL_PRIORITY_CLASS),
    (Priority::Normal, NORMAL_PRIORITY_CLASS),
    (Priority::BelowNormal, BELOW_NORMAL_PRIORITY_CLASS),
    (Priority::Idle, IDLE_PRIORITY_CLASS),
];

pub fn priority(pid: u32) -> Option<Priority> {
    let process = open(pid, PROCESS_QUERY_LIMITED_INFORMATION)?;
    // SAFETY: query on a handle we own.
    let class = unsafe { GetPriorityClass(process.0) };
    PRIORITY_CLASSES
        .iter()
        .find(|(_, flag)| flag.0 == class)
        .map(|(p, _)| *p)
}

pub fn set_priority(pid: u32, priority: Priority) -> bool {
    let Some(process) = open(pid, PROCESS_SET_INFORMATION) else {
        return false;
    };
    let Some((_, class)) = PRIORITY_CLASSES.iter().find(|(p, _)| *p == priority) else {
        return false;
    };
    // SAFETY: handle opened with PROCESS_SET_INFORMATION.
    unsafe { SetPriorityClass(process.0, *class) }.is_ok()
}

pub fn terminate(pid: u32) -> bool {
    let Some(process) = open(pid, PROCESS_TERMINATE) else {
        return false;
    };
    // SAFETY: handle opened with PROCESS_TERMINATE.
    unsafe { TerminateProcess(process.0, 1) }.is_ok()
}

/// Suspends or resumes every thread of a process.
///
/// Returns `true` when at least one thread changed state.
pub fn set_suspended(pid: u32, suspended: bool) -> bool {
    // SAFETY: the snapshot handle is owned and closed by `Owned`.
    let Ok(snapshot) = (unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPTHREAD, 0) }) else {
        return false;
    };
    let snapshot = Owned(snapshot);

    let mut entry = THREADENTRY32 {
        dwSize: mem::size_of::<THREADENTRY32>() as u32,
        ..Default::default()
    };
    let mut changed = false;

    // SAFETY: `entry` carries its size as the toolhelp API requires.
    let mut more = unsafe { Thread32First(snapshot.0, &mut entry) }.is_ok();
    while more {
        if entry.th32OwnerProcessID == pid {
            changed |= set_thread_suspended(entry.th32ThreadID, suspended);
        }
        more = unsafe { Thread32Next(snapshot.0, &mut entry) }.is_ok();
    }
    changed
}

fn set_thread_suspended(tid: u32, suspended: bool) -> bool {
    // SAFETY: the thread handle is closed by `Owned`.
    let Ok(thread) = (unsafe { OpenThread(THREAD_SUSPEND_RESUME, false, tid) }) else {
        return false;
    };
    let thread = Owned(thread);
    let previous = unsafe {
        if suspended {
            SuspendThread(thread.0)
        } else {
            ResumeThread(thread.0)
        }
    };
    previous != u32::MAX
}
