use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 若文件大小不超过阈值则删除，返回仍然保留的路径
///
/// 调用前捕获文件必须已经关闭，否则大小可能尚未落盘。
pub fn prune_if_trivial(path: &Path, threshold: u64) -> io::Result<Option<PathBuf>> {
    let size = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    if size <= threshold {
        fs::remove_file(path)?;
        tracing::debug!(path = %path.display(), size, "Pruned trivial artifact");
        Ok(None)
    } else {
        Ok(Some(path.to_path_buf()))
    }
}

/// 读取保留下来的捕获文件，非 UTF-8 字节做有损替换
pub fn read_capture(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prune_empty_and_newline_only() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("stdout.txt");
        let newline = temp_dir.path().join("stderr.txt");
        fs::write(&empty, "").unwrap();
        fs::write(&newline, "\r\n").unwrap();

        assert_eq!(prune_if_trivial(&empty, 2).unwrap(), None);
        assert_eq!(prune_if_trivial(&newline, 2).unwrap(), None);
        assert!(!empty.exists());
        assert!(!newline.exists());
    }

    #[test]
    fn test_keep_substantive_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stderr.txt");
        fs::write(&path, "abc").unwrap();

        assert_eq!(prune_if_trivial(&path, 2).unwrap(), Some(path.clone()));
        assert!(path.exists());
        assert_eq!(read_capture(&path).unwrap(), "abc");
    }

    #[test]
    fn test_threshold_override() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stdout.txt");
        fs::write(&path, "\n").unwrap();

        assert_eq!(prune_if_trivial(&path, 0).unwrap(), Some(path.clone()));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stdout.txt");
        assert_eq!(prune_if_trivial(&path, 2).unwrap(), None);
    }
}
