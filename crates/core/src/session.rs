//! Unlock/lock bracketing of configuration memory access.
//!
//! The device only accepts seeks and writes while its configuration memory
//! is unlocked. [`scoped`] unlocks, runs a body against a [`LockedSession`],
//! and relocks on every exit path, including errors and panics.

use crate::address::MemoryAddress;
use crate::error::{Error, Result};
use crate::report::{self, Opcode, ReportSize};
use crate::transport::{self, FeatureTransport};
use tracing::{debug, warn};

/// Issue `LOCK 0`.
pub fn unlock(transport: &mut dyn FeatureTransport) -> Result<()> {
    debug!("unlocking configuration memory");
    let out = report::encode(ReportSize::Short, Opcode::Lock, &report::lock_args(false))?;
    transport::set_report(transport, ReportSize::Short, &out)
}

/// Issue `LOCK 1`.
pub fn lock(transport: &mut dyn FeatureTransport) -> Result<()> {
    debug!("locking configuration memory");
    let out = report::encode(ReportSize::Short, Opcode::Lock, &report::lock_args(true))?;
    transport::set_report(transport, ReportSize::Short, &out)
}

/// Run `body` with configuration memory unlocked.
///
/// The relock is attempted whether or not `body` succeeds. No transfer is
/// retried. If the relock fails, the result is
/// [`Error::LockStateAmbiguous`] carrying the body's error, if any.
pub fn scoped<T, F>(transport: &mut dyn FeatureTransport, body: F) -> Result<T>
where
    F: FnOnce(&mut LockedSession<'_>) -> Result<T>,
{
    if let Err(e) = unlock(transport) {
        // the unlock may have landed even though the transfer reported failure
        return Err(relock_after(transport, e));
    }

    let mut session = LockedSession {
        transport,
        armed: true,
    };
    let outcome = body(&mut session);
    session.armed = false;
    let relock = lock(&mut *session.transport);

    match (outcome, relock) {
        (outcome, Ok(())) => outcome,
        (outcome, Err(lock_error)) => {
            warn!(error = %lock_error, "relock failed, device may be left unlocked");
            Err(Error::LockStateAmbiguous {
                body_error: outcome.err().map(Box::new),
                lock_error: Box::new(lock_error),
            })
        }
    }
}

fn relock_after(transport: &mut dyn FeatureTransport, err: Error) -> Error {
    match lock(transport) {
        Ok(()) => err,
        Err(lock_error) => Error::LockStateAmbiguous {
            body_error: Some(Box::new(err)),
            lock_error: Box::new(lock_error),
        },
    }
}

/// Memory access available while the device is unlocked.
pub struct LockedSession<'a> {
    transport: &'a mut dyn FeatureTransport,
    armed: bool,
}

impl LockedSession<'_> {
    /// Seek to `addr` announcing `n` bytes, then read them back.
    pub fn read(&mut self, size: ReportSize, addr: MemoryAddress, n: u8) -> Result<Vec<u8>> {
        if n as usize > size.max_read() {
            return Err(Error::ArgumentsTooLong {
                len: n as usize,
                capacity: size.max_read(),
            });
        }

        let seek = report::encode(size, Opcode::Seek, &report::seek_args(addr, n))?;
        transport::set_report(&mut *self.transport, size, &seek)?;
        let raw = transport::get_report(&mut *self.transport, size)?;
        let payload = report::decode(&raw)?;
        payload
            .get(..n as usize)
            .map(<[u8]>::to_vec)
            .ok_or(Error::ShortResponse { len: raw.len() })
    }

    /// Store `data` at `addr` with a single `WRITE`.
    pub fn write(&mut self, size: ReportSize, addr: MemoryAddress, data: &[u8]) -> Result<()> {
        let args = report::write_args(addr, data)?;
        let out = report::encode(size, Opcode::Write, &args)?;
        transport::set_report(&mut *self.transport, size, &out)
    }
}

impl Drop for LockedSession<'_> {
    fn drop(&mut self) {
        // only reached armed when the body unwound
        if self.armed {
            if let Err(e) = lock(&mut *self.transport) {
                warn!(error = %e, "relock during unwind failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::SimulatedMouse;

    const ADDR: MemoryAddress = MemoryAddress::new(0x49, 4);

    #[test]
    fn scoped_brackets_body_with_unlock_and_lock() {
        let mut dev = SimulatedMouse::new();
        scoped(&mut dev, |s| s.write(ReportSize::Short, ADDR, &[1, 2, 3])).unwrap();
        assert_eq!(dev.lock_events(), vec![0, 1]);
        assert!(dev.is_locked());
        assert_eq!(dev.peek(ADDR, 3), &[1, 2, 3]);
    }

    #[test]
    fn scoped_relocks_when_body_fails_midway() {
        // unlock, first write, then the second write fails
        let mut dev = SimulatedMouse::new().fail_transfer(3);
        let result = scoped(&mut dev, |s| {
            s.write(ReportSize::Short, ADDR, &[1])?;
            s.write(ReportSize::Short, ADDR, &[2])?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::Hid(_))));
        assert_eq!(dev.lock_events(), vec![0, 1]);
        assert!(dev.is_locked());
        // partial write is not rolled back
        assert_eq!(dev.peek(ADDR, 1), &[1]);
    }

    #[test]
    fn failed_relock_after_failed_body_wraps_both() {
        let mut dev = SimulatedMouse::new().fail_transfer(2).failing_lock();
        let result = scoped(&mut dev, |s| s.write(ReportSize::Short, ADDR, &[1]));
        match result {
            Err(Error::LockStateAmbiguous {
                body_error: Some(body),
                lock_error,
            }) => {
                assert!(matches!(*body, Error::Hid(_)));
                assert!(matches!(*lock_error, Error::Hid(_)));
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(dev.lock_events(), vec![0, 1]);
    }

    #[test]
    fn failed_unlock_still_attempts_relock() {
        let mut dev = SimulatedMouse::new().fail_transfer(1);
        let mut ran = false;
        let result = scoped(&mut dev, |_| {
            ran = true;
            Ok(())
        });
        assert!(matches!(result, Err(Error::Hid(_))));
        assert!(!ran);
        assert_eq!(dev.lock_events(), vec![0, 1]);
    }

    #[test]
    fn scoped_relocks_after_body_error() {
        let mut dev = SimulatedMouse::new();
        let result: Result<()> = scoped(&mut dev, |s| {
            s.write(ReportSize::Short, ADDR, &[9])?;
            Err(Error::invalid_value("test", "boom"))
        });
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
        assert_eq!(dev.lock_events(), vec![0, 1]);
        assert!(dev.is_locked());
    }

    #[test]
    fn failed_relock_after_success_is_ambiguous() {
        let mut dev = SimulatedMouse::new().failing_lock();
        let result = scoped(&mut dev, |s| s.read(ReportSize::Short, ADDR, 1));
        assert!(matches!(
            result,
            Err(Error::LockStateAmbiguous {
                body_error: None,
                ..
            })
        ));
    }

    #[test]
    fn scoped_relocks_on_panic() {
        let mut dev = SimulatedMouse::new();
        let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _: Result<()> = scoped(&mut dev, |_| panic!("body panicked"));
        }));
        assert!(caught.is_err());
        assert_eq!(dev.lock_events(), vec![0, 1]);
        assert!(dev.is_locked());
    }

    #[test]
    fn read_returns_exactly_n_bytes() {
        let mut dev = SimulatedMouse::new();
        dev.poke(ADDR, &[7, 6, 5, 4, 3, 2, 1, 0]);
        let data = scoped(&mut dev, |s| s.read(ReportSize::Short, ADDR, 7)).unwrap();
        assert_eq!(data, vec![7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn read_longer_than_report_rejected_before_transfer() {
        let mut dev = SimulatedMouse::new();
        let result = scoped(&mut dev, |s| s.read(ReportSize::Short, ADDR, 9));
        assert!(matches!(result, Err(Error::ArgumentsTooLong { .. })));
        // only the unlock and lock went out
        assert_eq!(dev.sent.len(), 2);
    }
}
