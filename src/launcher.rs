// launcher.rs

use std::ffi::CString;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

use itertools::Itertools;
use nix::errno::Errno;
use nix::fcntl::OFlag;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, pipe2, write, ForkResult, Pid};

use crate::error::ShellError;

/// Runs `args[0]` with `args` as its argument list and blocks until it exits.
///
/// The child inherits the environment, working directory and standard streams.
/// If the program cannot be started, the child reports the `execvp` errno back
/// through a close-on-exec pipe and the failure comes back as `ShellError::Launch`.
pub fn launch(args: &[&str]) -> Result<WaitStatus, ShellError> {
    let Some(&program) = args.first() else {
        return Err(ShellError::launch("", Errno::EINVAL));
    };
    let argv = args
        .iter()
        .map(|arg| CString::new(*arg).map_err(|_| ShellError::NulByte(arg.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    // Built before forking: the child must not allocate.
    let argv_ptrs: Vec<*const libc::c_char> = argv
        .iter()
        .map(|arg| arg.as_ptr())
        .chain(std::iter::once(std::ptr::null()))
        .collect();
    log::debug!("launching {}", args.iter().join(" "));

    let (read_end, write_end) = pipe2(OFlag::O_CLOEXEC).map_err(|e| ShellError::launch(program, e))?;
    // SAFETY: both descriptors were just created by pipe2 and are owned by nothing else.
    let (read_end, write_end) = unsafe { (OwnedFd::from_raw_fd(read_end), OwnedFd::from_raw_fd(write_end)) };

    match unsafe { fork() } {
        Ok(ForkResult::Child) => {
            // SAFETY: argv_ptrs is a null-terminated array of pointers into argv, which outlives the call.
            unsafe { libc::execvp(argv_ptrs[0], argv_ptrs.as_ptr()) };
            let errno = Errno::last();
            let _ = write(write_end.as_raw_fd(), &(errno as i32).to_ne_bytes());
            unsafe { libc::_exit(127) }
        }
        Ok(ForkResult::Parent { child }) => {
            drop(write_end);
            let report = read_exec_report(File::from(read_end));
            let status = wait_for(child, program)?;
            match report {
                Some(code) => Err(ShellError::launch(program, Errno::from_i32(code))),
                None => {
                    log::debug!("{} finished: {:?}", program, status);
                    Ok(status)
                }
            }
        }
        Err(errno) => Err(ShellError::launch(program, errno)),
    }
}

/// Reads the errno the child writes when `execvp` fails. End of file means exec succeeded.
fn read_exec_report(mut pipe: File) -> Option<i32> {
    let mut buf = [0u8; 4];
    let mut filled = 0;
    while filled < buf.len() {
        match pipe.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("reading exec status: {}", e);
                break;
            }
        }
    }
    (filled == buf.len()).then(|| i32::from_ne_bytes(buf))
}

fn wait_for(child: Pid, program: &str) -> Result<WaitStatus, ShellError> {
    loop {
        match waitpid(child, None) {
            Ok(status) => return Ok(status),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ShellError::launch(program, errno)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runs_program_to_completion() {
        let status = launch(&["true"]).unwrap();
        assert!(matches!(status, WaitStatus::Exited(_, 0)));
    }

    #[test]
    fn passes_arguments() {
        let status = launch(&["sh", "-c", "exit 3"]).unwrap();
        assert!(matches!(status, WaitStatus::Exited(_, 3)));
    }

    #[test]
    fn missing_program_reports_errno() {
        let err = launch(&["definitely-not-a-real-program-4242"]).unwrap_err();
        match err {
            ShellError::Launch { program, code, .. } => {
                assert_eq!(program, "definitely-not-a-real-program-4242");
                assert_eq!(code, libc::ENOENT);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn launches_from_several_threads() {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    for _ in 0..10 {
                        assert!(matches!(launch(&["true"]), Ok(WaitStatus::Exited(_, 0))));
                        assert!(launch(&["definitely-not-a-real-program-4242"]).is_err());
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
    }

    #[test]
    fn nul_byte_is_rejected_before_fork() {
        let err = launch(&["echo", "a\0b"]).unwrap_err();
        assert!(matches!(err, ShellError::NulByte(_)));
    }
}
