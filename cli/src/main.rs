//! `dataseal` command-line front end

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use dataseal_sdk_core::{
    direct, import_public_key_with_policy, Envelope, EnvelopeEncryptor, KeyPolicy,
    PublicKeyMaterial,
};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dataseal", version, about = "Seal dataset locators for on-chain submission")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Seal plaintext into a hybrid RSA-OAEP + AES-GCM envelope
    Seal(SealArgs),
    /// Encrypt plaintext directly with RSA-OAEP (short inputs only)
    Direct(SealArgs),
    /// Validate an envelope and print its field sizes
    Inspect {
        /// Envelope file; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Print the SPKI fingerprint of a recipient key
    Fingerprint(KeyArgs),
}

#[derive(Debug, Args)]
struct KeyArgs {
    /// PEM file holding the recipient SubjectPublicKeyInfo
    #[arg(long = "key", env = "DATASEAL_PUBLIC_KEY_FILE")]
    key_file: PathBuf,

    /// Reject RSA keys with a smaller modulus
    #[arg(long, env = "DATASEAL_MIN_KEY_BITS", default_value_t = dataseal_sdk_core::policy::DEFAULT_MIN_MODULUS_BITS)]
    min_key_bits: usize,
}

#[derive(Debug, Args)]
struct SealArgs {
    #[command(flatten)]
    key: KeyArgs,

    /// Plaintext to seal; stdin when omitted
    #[arg(long)]
    text: Option<String>,

    /// Refuse plaintexts longer than this many bytes
    #[arg(long, env = "DATASEAL_MAX_PLAINTEXT_BYTES")]
    max_plaintext_bytes: Option<usize>,
}

impl KeyArgs {
    fn policy(&self, max_plaintext_bytes: Option<usize>) -> KeyPolicy {
        KeyPolicy {
            min_modulus_bits: self.min_key_bits,
            max_plaintext_bytes,
        }
    }

    fn load(&self, policy: &KeyPolicy) -> Result<PublicKeyMaterial> {
        let pem = std::fs::read_to_string(&self.key_file)
            .with_context(|| format!("reading key file {}", self.key_file.display()))?;
        let recipient = import_public_key_with_policy(&pem, policy)
            .with_context(|| format!("importing key from {}", self.key_file.display()))?;
        tracing::info!(
            path = %self.key_file.display(),
            fingerprint = %recipient.fingerprint(),
            "loaded recipient key"
        );
        Ok(recipient)
    }
}

fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()));
    }
    read_trimmed(io::stdin().lock())
}

fn read_trimmed<R: Read>(mut reader: R) -> Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf).context("reading stdin")?;
    // A trailing newline from `echo` is not part of the locator
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

fn run(cli: Cli) -> Result<String> {
    match cli.command {
        Command::Seal(args) => {
            let policy = args.key.policy(args.max_plaintext_bytes);
            let recipient = args.key.load(&policy)?;
            let plaintext = read_input(args.text, None)?;
            policy.validate_plaintext(&plaintext)?;
            Ok(EnvelopeEncryptor::new().encrypt_envelope(&recipient, &plaintext)?)
        }
        Command::Direct(args) => {
            let policy = args.key.policy(args.max_plaintext_bytes);
            let recipient = args.key.load(&policy)?;
            let plaintext = read_input(args.text, None)?;
            policy.validate_plaintext(&plaintext)?;
            if plaintext.len() > recipient.max_oaep_message_len() {
                bail!(
                    "plaintext is {} bytes; direct RSA-OAEP with this key allows at most {} (use `seal`)",
                    plaintext.len(),
                    recipient.max_oaep_message_len()
                );
            }
            Ok(direct::rsa_oaep_encrypt(
                &recipient,
                &mut dataseal_sdk_core::SystemRandom,
                &plaintext,
            )?)
        }
        Command::Inspect { file } => {
            let json = read_input(None, file.as_deref())?;
            let envelope = Envelope::from_json(json.trim()).context("decoding envelope")?;
            Ok(format!(
                "alg={} ek={}B iv={}B ct={}B",
                envelope.alg,
                envelope.encrypted_key.len(),
                envelope.nonce.len(),
                envelope.ciphertext.len()
            ))
        }
        Command::Fingerprint(key) => {
            let recipient = key.load(&key.policy(None))?;
            Ok(format!(
                "{} rsa-{}",
                recipient.fingerprint(),
                recipient.modulus_bits()
            ))
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let output = run(Cli::parse())?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUBLIC_PEM: &str = "../sdk-core/tests/fixtures/recipient_a_public.pem";
    const RSA_1024_PEM: &str = "../sdk-core/tests/fixtures/rsa1024_public.pem";

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dataseal").chain(args.iter().copied())).unwrap()
    }

    fn key_path(rel: &str) -> String {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join(rel)
            .display()
            .to_string()
    }

    #[test]
    fn test_seal_command() {
        let key = key_path(PUBLIC_PEM);
        let out = run(parse(&["seal", "--key", &key, "--text", "https://example.org/data.h5ad"]))
            .unwrap();
        let envelope = Envelope::from_json(&out).unwrap();
        assert_eq!(envelope.encrypted_key.len(), 256);
    }

    #[test]
    fn test_seal_respects_min_key_bits() {
        let key = key_path(RSA_1024_PEM);
        assert!(run(parse(&["seal", "--key", &key, "--text", "x"])).is_err());
        assert!(run(parse(&[
            "seal",
            "--key",
            &key,
            "--min-key-bits",
            "1024",
            "--text",
            "x"
        ]))
        .is_ok());
    }

    #[test]
    fn test_plaintext_limit() {
        let key = key_path(PUBLIC_PEM);
        let err = run(parse(&[
            "seal",
            "--key",
            &key,
            "--max-plaintext-bytes",
            "4",
            "--text",
            "too long",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("plaintext-too-large"));
    }

    #[test]
    fn test_direct_command_limits() {
        let key = key_path(PUBLIC_PEM);
        assert!(run(parse(&["direct", "--key", &key, "--text", "short"])).is_ok());

        let long = "x".repeat(300);
        assert!(run(parse(&["direct", "--key", &key, "--text", &long])).is_err());
    }

    #[test]
    fn test_fingerprint_command() {
        let key = key_path(PUBLIC_PEM);
        let out = run(parse(&["fingerprint", "--key", &key])).unwrap();
        assert_eq!(
            out,
            "3a98ac73882375404fc496d459f75dc0895a9397d34bb1c947fa22bae7d8646b rsa-2048"
        );
    }

    #[test]
    fn test_missing_key_file() {
        let err = run(parse(&["fingerprint", "--key", "/nonexistent/key.pem"])).unwrap_err();
        assert!(err.to_string().contains("reading key file"));
    }

    #[test]
    fn test_inspect_command() {
        let key = key_path(PUBLIC_PEM);
        let sealed = run(parse(&["seal", "--key", &key, "--text", "https://example.org/data.h5ad"]))
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("envelope.json");
        std::fs::write(&path, format!("{sealed}\n")).unwrap();

        let out = run(parse(&["inspect", path.to_str().unwrap()])).unwrap();
        assert_eq!(out, "alg=RSA-OAEP+AES-GCM ek=256B iv=12B ct=45B");
    }

    #[test]
    fn test_inspect_rejects_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let ct = "YWFhYWFhYWFhYWFhYWFhYWE=";

        let wrong_alg = dir.path().join("wrong_alg.json");
        std::fs::write(
            &wrong_alg,
            format!(r#"{{"alg":"RSA-OAEP+AES-CBC","ek":"/wA=","iv":"AAAAAAAAAAAAAAAA","ct":"{ct}"}}"#),
        )
        .unwrap();
        let err = run(parse(&["inspect", wrong_alg.to_str().unwrap()])).unwrap_err();
        assert!(err.to_string().contains("decoding envelope"));

        let extra = dir.path().join("extra.json");
        std::fs::write(
            &extra,
            format!(r#"{{"alg":"RSA-OAEP+AES-GCM","ek":"/wA=","iv":"AAAAAAAAAAAAAAAA","ct":"{ct}","v":1}}"#),
        )
        .unwrap();
        assert!(run(parse(&["inspect", extra.to_str().unwrap()])).is_err());

        assert!(run(parse(&["inspect", "/nonexistent/envelope.json"])).is_err());
    }

    #[test]
    fn test_stdin_trailing_newline_trimmed() {
        assert_eq!(
            read_trimmed(&b"https://example.org/data.h5ad\n"[..]).unwrap(),
            "https://example.org/data.h5ad"
        );
        assert_eq!(read_trimmed(&b"locator\r\n\n"[..]).unwrap(), "locator");
        // Only line endings go; other whitespace is part of the input
        assert_eq!(read_trimmed(&b" locator \n"[..]).unwrap(), " locator ");
        assert_eq!(read_trimmed(&b""[..]).unwrap(), "");
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
