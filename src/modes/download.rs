use std::fs;
use std::path::PathBuf;

use log::info;

use crate::config::Config;
use crate::errors::ParserError;
use crate::session::{get_response, Session};
use crate::utils::cook_page;

const PDF_A4_LINK: &str = r#"div[role=main] table.docutils [href$="pdf-a4.zip"]"#;

/// Saves the A4 PDF documentation archive under the downloads directory.
pub fn download(session: &dyn Session, config: &Config) -> Result<PathBuf, ParserError> {
    let downloads_url = config.main_doc_url.join("download.html")?;
    let page = cook_page(session, &downloads_url)?;

    let href = page
        .select_one(PDF_A4_LINK)?
        .and_then(|link| link.value().attr("href"))
        .ok_or_else(|| {
            ParserError::ElementNotFound(format!("pdf-a4.zip link on {downloads_url}"))
        })?;
    let archive_url = page.join(href)?;

    let filename = archive_url
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ParserError::ElementNotFound(format!("file name in {archive_url}")))?
        .to_string();

    fs::create_dir_all(&config.downloads_dir)?;
    let archive_path = config.downloads_dir.join(filename);

    let response = get_response(session, archive_url.as_str())?;
    fs::write(&archive_path, response.bytes())?;

    info!("Archive downloaded and saved: {}", archive_path.display());
    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modes::fixtures;
    use crate::session::stub::StubSession;

    const DOWNLOAD_PAGE: &str = r#"
        <div class="body" role="main">
          <table class="docutils align-default"><tbody>
            <tr><td>PDF (US-Letter)</td>
                <td><a class="reference external" href="archives/python-3.13-docs-pdf-letter.zip">Download</a></td></tr>
            <tr><td>PDF (A4)</td>
                <td><a class="reference external" href="archives/python-3.13-docs-pdf-a4.zip">Download</a></td></tr>
          </tbody></table>
        </div>"#;

    #[test]
    fn saves_archive_bytes_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixtures::config(dir.path());
        let archive: Vec<u8> = vec![0x50, 0x4b, 0x03, 0x04, 0xff, 0x00];
        let session = StubSession::new()
            .page("https://docs.test/3/download.html", DOWNLOAD_PAGE)
            .page(
                "https://docs.test/3/archives/python-3.13-docs-pdf-a4.zip",
                archive.clone(),
            );

        let path = download(&session, &config).unwrap();
        assert_eq!(path, config.downloads_dir.join("python-3.13-docs-pdf-a4.zip"));
        assert_eq!(fs::read(&path).unwrap(), archive);
    }

    #[test]
    fn missing_link_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixtures::config(dir.path());
        let session = StubSession::new().page(
            "https://docs.test/3/download.html",
            r#"<div role="main"><a href="python-docs-pdf-a4.zip">outside table</a></div>"#,
        );

        assert!(matches!(
            download(&session, &config),
            Err(ParserError::ElementNotFound(_))
        ));
        assert!(!config.downloads_dir.exists());
    }

    #[test]
    fn failed_archive_fetch_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixtures::config(dir.path());
        let session = StubSession::new().page("https://docs.test/3/download.html", DOWNLOAD_PAGE);

        assert!(matches!(
            download(&session, &config),
            Err(ParserError::ConnectionFailure { .. })
        ));
    }
}
