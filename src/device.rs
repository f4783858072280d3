//! The input-source seam between backends and the gesture core.

use crate::error::SourceError;
use crate::event::RawEvent;
use crate::metadata::DeviceMeta;

/// A readable hardware input source.
///
/// `read_events` blocks until at least one event is available and returns the events in
/// stream order. A source that has reached end of stream returns [`SourceError::Closed`];
/// any other error is stream-fatal.
pub trait InputSource {
    fn read_events(&mut self) -> Result<Vec<RawEvent>, SourceError>;
    fn name(&self) -> &str;
    fn id(&self) -> &str;
    fn metadata(&self) -> DeviceMeta;
}
