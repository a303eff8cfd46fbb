//! Wall-clock contract supplied by the host.

use oscframe_proto::Timetag;

/// Host-supplied time source.
///
/// The server samples the clock once per drain pass. A host without a
/// real time reference returns [`Timetag::IMMEDIATELY`], which the
/// dispatcher treats as "everything queued is due".
///
/// The call may block or yield at the host's discretion; the library
/// itself never sleeps or retries around it.
pub trait Clock {
    /// Current time as an NTP-format timetag.
    fn time(&self) -> Timetag;
}

/// Plain functions and closures work directly as clocks, mirroring the
/// callback the original embedded API took at server construction.
impl<F> Clock for F
where
    F: Fn() -> Timetag,
{
    fn time(&self) -> Timetag {
        self()
    }
}
