use crate::scroll::cursor::ScrollCursor;
use futures::{Stream, stream};
use model::records::hit::Hit;

impl ScrollCursor {
    /// Lazily yields the remaining hits of the scroll.
    pub fn into_stream(self) -> impl Stream<Item = Hit> + Send {
        stream::unfold(self, |mut cursor| async move {
            let hit = cursor.advance().await?;
            Some((hit, cursor))
        })
    }
}
