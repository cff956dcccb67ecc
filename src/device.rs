use crate::builtin::BuiltinCommand;
use crate::command::ExitCode;
use crate::env::Environment;
use crate::history::HistoryLog;
use anyhow::Result;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Directory block devices are resolved under.
const DEV_DIR: &str = "/dev";

/// Size of one device sector.
pub const SECTOR_SIZE: usize = 512;

/// Conventional MBR boot signature at offsets 510-511.
const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];

/// True when the sector carries the 0xAA55 boot signature.
pub fn has_boot_signature(sector: &[u8; SECTOR_SIZE]) -> bool {
    sector[SECTOR_SIZE - 2..] == BOOT_SIGNATURE
}

/// Read exactly the first sector of the file at `path`, read-only.
///
/// A short read is an error; the handle is released on every return path.
pub fn read_boot_sector(path: &Path) -> io::Result<[u8; SECTOR_SIZE]> {
    let mut device = File::open(path)?;
    let mut sector = [0u8; SECTOR_SIZE];
    device.read_exact(&mut sector)?;
    Ok(sector)
}

/// Report whether `/dev/<name>` carries a boot signature. Matches `\l <name>`.
///
/// Open and read failures are reported and never produce a verdict; the
/// shell keeps running either way.
pub(crate) struct BootCheck {
    device: String,
}

impl BootCheck {
    fn device_path(&self) -> PathBuf {
        Path::new(DEV_DIR).join(&self.device)
    }
}

impl BuiltinCommand for BootCheck {
    fn try_parse(line: &str) -> Option<Self> {
        line.strip_prefix("\\l ").map(|rest| BootCheck {
            device: rest.to_string(),
        })
    }

    fn execute(
        self,
        stdout: &mut dyn Write,
        _env: &mut Environment,
        _history: &HistoryLog,
    ) -> Result<ExitCode> {
        let path = self.device_path();
        let sector = match read_boot_sector(&path) {
            Ok(sector) => sector,
            Err(e) => {
                writeln!(stdout, "cannot read first sector of {}: {}", path.display(), e)?;
                return Ok(1);
            }
        };
        if has_boot_signature(&sector) {
            writeln!(stdout, "device {} is bootable (signature 0xAA55)", self.device)?;
        } else {
            writeln!(stdout, "device {} is not bootable", self.device)?;
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env as stdenv;
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_unique_temp_dir() -> io::Result<PathBuf> {
        let mut p = stdenv::temp_dir();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        p.push(format!("device_test_{}_{}", std::process::id(), nanos));
        fs::create_dir_all(&p)?;
        Ok(p)
    }

    #[test]
    fn test_signature_present() {
        let mut sector = [0u8; SECTOR_SIZE];
        sector[510] = 0x55;
        sector[511] = 0xAA;
        assert!(has_boot_signature(&sector));
    }

    #[test]
    fn test_signature_absent() {
        let zeroed = [0u8; SECTOR_SIZE];
        assert!(!has_boot_signature(&zeroed));

        // Right bytes, wrong order.
        let mut swapped = [0u8; SECTOR_SIZE];
        swapped[510] = 0xAA;
        swapped[511] = 0x55;
        assert!(!has_boot_signature(&swapped));

        // Signature bytes anywhere else don't count.
        let mut elsewhere = [0u8; SECTOR_SIZE];
        elsewhere[0] = 0x55;
        elsewhere[1] = 0xAA;
        assert!(!has_boot_signature(&elsewhere));
    }

    #[test]
    fn test_read_boot_sector_from_file() {
        let dir = make_unique_temp_dir().expect("failed to create temp dir");
        let path = dir.join("fake_device");

        let mut contents = vec![0u8; SECTOR_SIZE + 32];
        contents[510] = 0x55;
        contents[511] = 0xAA;
        fs::write(&path, &contents).expect("write failed");

        let sector = read_boot_sector(&path).expect("read failed");
        assert!(has_boot_signature(&sector));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_read_boot_sector_short_file_is_an_error() {
        let dir = make_unique_temp_dir().expect("failed to create temp dir");
        let path = dir.join("short_device");
        fs::write(&path, vec![0u8; 100]).expect("write failed");

        assert!(read_boot_sector(&path).is_err());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_device_reports_error_without_verdict() {
        let cmd = BootCheck::try_parse("\\l ops_shell_no_such_device").expect("should match");
        let mut env = Environment {
            vars: HashMap::new(),
            should_exit: false,
        };
        let mut out = Vec::new();
        let code = cmd.execute(&mut out, &mut env, &HistoryLog::new()).unwrap();
        assert_eq!(code, 1);

        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("cannot read first sector"));
        assert!(!s.contains("is bootable"));
        assert!(!s.contains("is not bootable"));
    }
}
