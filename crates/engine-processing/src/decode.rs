use crate::error::DecodeError;
use model::records::{hit::Hit, record::Record};

/// Turns a raw hit into a record.
///
/// Implementations are pure: no I/O and no shared state. A failure only
/// affects the hit at hand.
pub trait HitDecoder: Send + Sync {
    fn decode(&self, hit: &Hit) -> Result<Record, DecodeError>;
}

impl<F> HitDecoder for F
where
    F: Fn(&Hit) -> Result<Record, DecodeError> + Send + Sync,
{
    fn decode(&self, hit: &Hit) -> Result<Record, DecodeError> {
        self(hit)
    }
}

/// Uses the hit's `_source` object as the record document.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceDecoder;

impl HitDecoder for SourceDecoder {
    fn decode(&self, hit: &Hit) -> Result<Record, DecodeError> {
        let source = hit
            .source
            .as_ref()
            .filter(|s| !s.is_null())
            .ok_or_else(|| DecodeError::MissingSource { id: hit.id.clone() })?;

        if !source.is_object() {
            return Err(DecodeError::NotAnObject { id: hit.id.clone() });
        }

        Ok(Record::new(&hit.id, &hit.index, source.clone()))
    }
}
