use crate::error::{Error, Result};
use isahc::prelude::*;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub struct Fetcher {
    url: String,
    cache: Option<PathBuf>,
}

impl Fetcher {
    pub fn new(url: String, cache: Option<PathBuf>) -> Self {
        Fetcher { url, cache }
    }

    /// Reads the cached page when it exists, otherwise downloads it.
    pub fn fetch(&self) -> Result<String> {
        if let Some(cache) = self.cache.as_ref().filter(|path| path.exists()) {
            info!("Load html data from '{}'", cache.display());

            return Ok(fs::read_to_string(cache)?);
        }

        info!("Load html data from '{}'", self.url);

        let mut response = isahc::get(&self.url)?;

        if response.status() != 200 {
            return Err(Error::Status(response.status().as_u16()));
        }

        Ok(response.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn it_reads_cached_page() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<h4>Update</h4>").unwrap();

        let fetcher = Fetcher::new(
            "http://localhost:9/unreachable".to_string(),
            Some(file.path().to_path_buf()),
        );

        assert_eq!("<h4>Update</h4>", fetcher.fetch().unwrap());
    }
}
