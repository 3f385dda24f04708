//! Remote OS classification and its capability table
//!
//! Everything that differs between POSIX and Windows targets (path joining,
//! argument quoting, probes, working-directory prefix, console code page)
//! lives in one [`OsProfile`] so callers never branch on the OS themselves.

use std::fmt;

use encoding_rs::Encoding;

/// Output marker printed by the remote existence probes
pub const EXISTS_MARKER: &str = "File exists";

/// Classification of the connected remote host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsClass {
    Posix,
    Windows,
}

impl OsClass {
    /// Command whose clean output identifies this OS
    pub fn probe_command(self) -> &'static str {
        match self {
            OsClass::Posix => "uname -a",
            OsClass::Windows => "cmd /c ver",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OsClass::Posix => "Linux/Unix",
            OsClass::Windows => "Windows",
        }
    }

    fn capabilities(self) -> &'static Capabilities {
        match self {
            OsClass::Posix => &POSIX,
            OsClass::Windows => &WINDOWS,
        }
    }
}

impl fmt::Display for OsClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct Capabilities {
    separator: char,
    script_name: &'static str,
    quote: fn(&str) -> String,
    exists_probe: fn(&str) -> String,
    in_directory: fn(&str, &str) -> String,
    invoke: fn(&str, &[String]) -> String,
    default_encoding: &'static Encoding,
}

static POSIX: Capabilities = Capabilities {
    separator: '/',
    script_name: "remote-deploy.sh",
    quote: posix_quote,
    exists_probe: posix_exists_probe,
    in_directory: posix_in_directory,
    invoke: posix_invoke,
    default_encoding: &encoding_rs::UTF_8_INIT,
};

static WINDOWS: Capabilities = Capabilities {
    separator: '\\',
    script_name: "remote-deploy.cmd",
    quote: windows_quote,
    exists_probe: windows_exists_probe,
    in_directory: windows_in_directory,
    invoke: windows_invoke,
    default_encoding: &encoding_rs::GBK_INIT,
};

/// OS-specific behavior for one session, resolved once after detection.
#[derive(Clone, Copy)]
pub struct OsProfile {
    class: OsClass,
    caps: &'static Capabilities,
    encoding: &'static Encoding,
}

impl OsProfile {
    pub fn new(class: OsClass) -> Self {
        let caps = class.capabilities();
        Self {
            class,
            caps,
            encoding: caps.default_encoding,
        }
    }

    /// Override the console code page used to decode Windows output.
    ///
    /// POSIX output is always UTF-8. Unknown labels keep the default.
    pub fn with_codepage(mut self, label: &str) -> Self {
        if self.class == OsClass::Windows {
            if let Some(encoding) = Encoding::for_label(label.trim().as_bytes()) {
                self.encoding = encoding;
            }
        }
        self
    }

    pub fn class(&self) -> OsClass {
        self.class
    }

    /// File name of the deploy script on this OS
    pub fn script_name(&self) -> &'static str {
        self.caps.script_name
    }

    pub fn encoding_name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Join a remote directory and a file name with this OS's separator
    pub fn join(&self, dir: &str, name: &str) -> String {
        let sep = self.caps.separator;
        let dir = match self.class {
            OsClass::Posix => dir.to_string(),
            OsClass::Windows => dir.replace('/', "\\"),
        };
        if dir.is_empty() {
            return name.to_string();
        }
        let trimmed = dir.trim_end_matches(sep);
        if trimmed.is_empty() {
            format!("{}{}", sep, name)
        } else {
            format!("{}{}{}", trimmed, sep, name)
        }
    }

    /// Directory part of a remote path; empty when there is none
    pub fn parent<'a>(&self, path: &'a str) -> &'a str {
        let idx = match self.class {
            OsClass::Posix => path.rfind('/'),
            OsClass::Windows => path.rfind(['\\', '/']),
        };
        match idx {
            Some(0) => &path[..1],
            Some(i) => &path[..i],
            None => "",
        }
    }

    /// Quote one argument so the remote shell receives it as a single token
    pub fn quote(&self, arg: &str) -> String {
        (self.caps.quote)(arg)
    }

    /// Command printing [`EXISTS_MARKER`] when `path` is an existing file
    pub fn exists_probe(&self, path: &str) -> String {
        (self.caps.exists_probe)(path)
    }

    /// Prefix `command` so it runs inside `dir`; unchanged when `dir` is empty
    pub fn in_directory(&self, dir: &str, command: &str) -> String {
        if dir.is_empty() {
            command.to_string()
        } else {
            (self.caps.in_directory)(dir, command)
        }
    }

    /// Command running `script` through the OS's interpreter with `args`
    pub fn script_invocation(&self, script: &str, args: &[String]) -> String {
        (self.caps.invoke)(script, args)
    }

    /// Decode raw console output with this OS's code page
    pub fn decode(&self, bytes: &[u8]) -> String {
        self.encoding
            .decode_without_bom_handling(bytes)
            .0
            .into_owned()
    }
}

impl fmt::Debug for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OsProfile")
            .field("class", &self.class)
            .field("encoding", &self.encoding.name())
            .finish()
    }
}

impl PartialEq for OsProfile {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.encoding == other.encoding
    }
}

fn posix_quote(arg: &str) -> String {
    format!("'{}'", arg.replace('\'', "'\\''"))
}

fn posix_exists_probe(path: &str) -> String {
    format!(
        "test -f {} && echo \"{}\" || echo \"File not found\"",
        posix_quote(path),
        EXISTS_MARKER
    )
}

fn posix_in_directory(dir: &str, command: &str) -> String {
    format!("cd {} && {}", posix_quote(dir), command)
}

fn posix_invoke(script: &str, args: &[String]) -> String {
    let mut line = format!("bash {}", posix_quote(script));
    for arg in args {
        line.push(' ');
        line.push_str(&posix_quote(arg));
    }
    line
}

fn windows_quote(arg: &str) -> String {
    format!("\"{}\"", arg.replace('"', "\"\""))
}

fn windows_exists_probe(path: &str) -> String {
    format!(
        "if exist {} (echo {}) else (echo File not found)",
        windows_quote(path),
        EXISTS_MARKER
    )
}

fn windows_in_directory(dir: &str, command: &str) -> String {
    format!("cd /d {} && {}", windows_quote(dir), command)
}

// `cmd /c` strips the first and last quote of its argument when it holds
// more than two quotes, so the whole line gets one extra outer pair.
fn windows_invoke(script: &str, args: &[String]) -> String {
    let mut inner = windows_quote(script);
    for arg in args {
        inner.push(' ');
        inner.push_str(&windows_quote(arg));
    }
    format!("cmd /c \"{}\"", inner)
}
