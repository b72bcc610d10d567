use crate::error::CliError;
use model::records::record::Record;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Writes records as one JSON document per line.
pub struct RecordSink {
    writer: BufWriter<Box<dyn AsyncWrite + Unpin + Send>>,
    written: u64,
}

impl RecordSink {
    pub async fn open(path: Option<&str>) -> Result<Self, CliError> {
        let writer: Box<dyn AsyncWrite + Unpin + Send> = match path {
            Some(path) => Box::new(tokio::fs::File::create(path).await?),
            None => Box::new(tokio::io::stdout()),
        };
        Ok(Self::new(writer))
    }

    pub fn new(writer: Box<dyn AsyncWrite + Unpin + Send>) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    pub async fn write(&mut self, records: &[Record]) -> Result<(), CliError> {
        for record in records {
            let mut line = serde_json::to_vec(&record.document)?;
            line.push(b'\n');
            self.writer.write_all(&line).await?;
        }
        self.written += records.len() as u64;
        Ok(())
    }

    pub async fn finish(mut self) -> Result<u64, CliError> {
        self.writer.flush().await?;
        Ok(self.written)
    }
}
