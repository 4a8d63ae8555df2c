use anyhow::{Context, Result, anyhow, bail};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use rowvalue::{DescriptorFactory, EngineConfig, LogicalType, RawValue, StorageType, TrimType, TypeDescriptor};

const HELP: &str = "\
commands:
  type <Type> [len] [prec]           start a new descriptor (Number, String, Date, ...)
  mask <pattern>                     set the conversion mask ('-' clears it)
  storage <normal|binary-string> [mask]
                                     switch storage; the mask applies to the stored text
  lenient <on|off>                   lenient string to number parsing
  parse <text>                       convert text into the current type
  show                               print the descriptor
  xml                                print the descriptor as XML
  compare <a> <b>                    parse both and compare them
  help, quit";

struct Session {
    factory: DescriptorFactory,
    meta: TypeDescriptor,
}

impl Session {
    fn new() -> Self {
        let factory = DescriptorFactory::new(EngineConfig::default());
        let meta = factory.create("value", LogicalType::String);
        Self { factory, meta }
    }

    fn execute(&mut self, line: &str) -> Result<bool> {
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command.to_ascii_lowercase().as_str() {
            "type" => self.set_type(rest)?,
            "mask" => {
                let mask = (rest != "-").then(|| rest.to_string());
                self.meta.set_conversion_mask(mask);
                println!("{}", self.describe());
            }
            "storage" => self.set_storage(rest)?,
            "lenient" => {
                let on = match rest {
                    "on" => true,
                    "off" => false,
                    other => bail!("expected on or off, got '{other}'"),
                };
                self.meta.set_lenient_string_to_number(on);
            }
            "parse" => {
                let raw = self.ingest(rest)?;
                self.print_value(&raw)?;
            }
            "show" => println!("{}", self.describe()),
            "xml" => println!("{}", self.meta.meta_to_xml()?),
            "compare" => {
                let (a, b) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: compare <a> <b>"))?;
                let a = self.ingest(a)?;
                let b = self.ingest(b.trim())?;
                println!("{:?}", self.meta.compare(&a, &b)?);
            }
            "help" => println!("{HELP}"),
            "quit" | "exit" => return Ok(false),
            other => bail!("unknown command '{other}', try help"),
        }
        Ok(true)
    }

    fn set_type(&mut self, args: &str) -> Result<()> {
        let mut parts = args.split_whitespace();
        let name = parts.next().ok_or_else(|| anyhow!("usage: type <Type> [len] [prec]"))?;
        let logical_type = LogicalType::from_description(name)
            .ok_or_else(|| anyhow!("unknown type '{name}'"))?;
        let length = parts.next().map(str::parse::<i32>).transpose().context("length")?.unwrap_or(-1);
        let precision = parts.next().map(str::parse::<i32>).transpose().context("precision")?.unwrap_or(-1);

        self.meta = self.factory.create_with_length("value", logical_type, length, precision);
        println!("{}", self.describe());
        Ok(())
    }

    fn set_storage(&mut self, args: &str) -> Result<()> {
        let (kind, mask) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
        match StorageType::from_code(kind) {
            Some(StorageType::Normal) => {
                self.meta.set_storage_metadata(None)?;
                self.meta.set_storage_type(StorageType::Normal);
            }
            Some(StorageType::BinaryString) => {
                self.meta.use_binary_string_storage();
                if !mask.trim().is_empty() {
                    let mut storage = self
                        .meta
                        .storage_metadata()
                        .cloned()
                        .ok_or_else(|| anyhow!("no storage metadata"))?;
                    storage.set_conversion_mask(Some(mask.trim().to_string()));
                    self.meta.set_storage_metadata(Some(storage))?;
                }
            }
            _ => bail!("expected normal or binary-string"),
        }
        println!("{}", self.describe());
        Ok(())
    }

    /// Text typed at the prompt, as it would arrive from a file.
    fn ingest(&self, text: &str) -> Result<RawValue> {
        if self.meta.storage_type() == StorageType::BinaryString {
            return Ok(RawValue::binary_string(text.as_bytes().to_vec()));
        }
        let mut source = self.factory.create("input", LogicalType::String);
        source.set_conversion_mask(self.meta.conversion_mask().map(str::to_string));
        Ok(self
            .meta
            .convert_from_string(Some(text), &source, None, None, TrimType::None)?)
    }

    fn print_value(&self, raw: &RawValue) -> Result<()> {
        if self.meta.is_null(raw)? {
            println!("null");
            return Ok(());
        }
        let native = self.meta.native_value(raw)?;
        let text = self.meta.get_string(raw)?;
        println!(
            "native: {}\nstring: {:?}\nhash:   {}",
            native.map(|v| v.to_string()).unwrap_or_default(),
            text.unwrap_or_default(),
            self.meta.hash_value(raw)?
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!(
            "{} mask={} identical={}",
            self.meta,
            self.meta.format_mask().unwrap_or_else(|| "-".to_string()),
            self.meta.is_identical_format()
        )
    }
}

fn init_tracing(args: &[String]) {
    let level = args
        .iter()
        .find_map(|arg| arg.strip_prefix("--debug="))
        .map(str::to_string);

    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    init_tracing(&args);

    let mut session = Session::new();
    let mut editor = DefaultEditor::new()?;

    println!("rowvalue shell, type help for commands");

    loop {
        match editor.readline("rowvalue> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(line);
                match session.execute(line) {
                    Ok(true) => {}
                    Ok(false) => break,
                    Err(err) => println!("error: {err:#}"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
