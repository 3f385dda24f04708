//! Property tests for remote argument quoting.

use proptest::prelude::*;

use front_deploy::domain::value_objects::{OsClass, OsProfile};

/// Split a POSIX command line made only of single-quoted words.
fn posix_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quoted = false;
    let mut escaped = false;
    for c in line.chars() {
        if escaped {
            current.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\'' => {
                quoted = !quoted;
                in_word = true;
            }
            '\\' if !quoted => {
                escaped = true;
                in_word = true;
            }
            ' ' if !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Split the line `cmd /c` hands to a batch file into `%0..%N`.
///
/// `cmd /c` drops the first and last quote of its argument. Batch then
/// splits on space, tab, `,`, `;` and `=` outside quotes, where every `"`
/// toggles the quoted state and stays part of the parameter.
fn batch_params(line: &str) -> Option<Vec<String>> {
    let inner = line.strip_prefix("cmd /c \"")?.strip_suffix('"')?;
    let mut params = Vec::new();
    let mut current = String::new();
    let mut in_param = false;
    let mut quoted = false;
    for c in inner.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                current.push(c);
                in_param = true;
            }
            ' ' | '\t' | ',' | ';' | '=' if !quoted => {
                if in_param {
                    params.push(std::mem::take(&mut current));
                    in_param = false;
                }
            }
            c => {
                current.push(c);
                in_param = true;
            }
        }
    }
    if quoted {
        return None;
    }
    if in_param {
        params.push(current);
    }
    Some(params)
}

/// Undo `"` quoting with doubled inner quotes.
fn windows_unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    Some(inner.replace("\"\"", "\""))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a POSIX-quoted argument reads back as exactly one word.
    #[test]
    fn property_posix_quote_is_one_word(arg in "(?s).{0,64}") {
        let quoted = OsProfile::new(OsClass::Posix).quote(&arg);
        prop_assert_eq!(posix_words(&quoted), vec![arg]);
    }

    /// PROPERTY: a POSIX invocation carries the script plus every argument, in order.
    #[test]
    fn property_posix_invocation_preserves_arguments(
        args in proptest::collection::vec("[^\\\\]{0,24}", 0..=5)
    ) {
        let line = OsProfile::new(OsClass::Posix).script_invocation("/srv/www/remote-deploy.sh", &args);
        let words = posix_words(&line);
        prop_assert_eq!(&words[0], "bash");
        prop_assert_eq!(&words[1], "/srv/www/remote-deploy.sh");
        prop_assert_eq!(&words[2..], &args[..]);
    }

    /// PROPERTY: a Windows invocation reaches the batch script as the script
    /// plus exactly five parameters, in order, whatever the arguments hold.
    #[test]
    fn property_windows_invocation_yields_five_batch_params(
        args in proptest::collection::vec("[^%\r\n]{0,24}", 5)
    ) {
        let script = "D:\\www\\shop\\remote-deploy.cmd";
        let line = OsProfile::new(OsClass::Windows).script_invocation(script, &args);

        let params = batch_params(&line);
        prop_assert!(params.is_some(), "unbalanced quotes in {}", line);
        let params = params.unwrap();
        prop_assert_eq!(params.len(), 6, "line: {}", line);
        prop_assert_eq!(windows_unquote(&params[0]), Some(script.to_string()));
        for (param, arg) in params[1..].iter().zip(&args) {
            prop_assert_eq!(windows_unquote(param), Some(arg.clone()));
        }
    }

    /// PROPERTY: Windows quoting round-trips through doubled quotes.
    #[test]
    fn property_windows_quote_round_trips(arg in "[^%]{0,64}") {
        let quoted = OsProfile::new(OsClass::Windows).quote(&arg);
        prop_assert_eq!(windows_unquote(&quoted), Some(arg));
    }
}
