//! CLI command implementations

use anyhow::{Context, bail};
use lineage_core::{
    Family, FamilyReceiver, Lexicon, LineageConfig, LineageError, Snapshot, WordId,
};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// A lexicon and its families, loaded from and saved back to one snapshot file.
struct Workbench {
    path: PathBuf,
    lexicon: Lexicon,
    families: Vec<Family>,
}

impl Workbench {
    fn open(root: &Path, config: &LineageConfig) -> anyhow::Result<Self> {
        let path = config.snapshot_path(root);
        let (lexicon, families) = match Snapshot::load(&path)
            .with_context(|| format!("reading snapshot {}", path.display()))?
        {
            Some(snapshot) => snapshot
                .restore(config.events.capacity)
                .with_context(|| format!("restoring snapshot {}", path.display()))?,
            None => (Lexicon::new(), Vec::new()),
        };
        tracing::debug!(
            "Opened {} words, {} families from {}",
            lexicon.len(),
            families.len(),
            path.display()
        );
        Ok(Workbench {
            path,
            lexicon,
            families,
        })
    }

    fn save(&self) -> anyhow::Result<()> {
        Snapshot::capture(&self.lexicon, &self.families)
            .save(&self.path)
            .with_context(|| format!("writing snapshot {}", self.path.display()))
    }

    /// Resolve `3` or `#3` to the live word in that slot.
    fn word(&self, arg: &str) -> anyhow::Result<WordId> {
        let digits = arg.strip_prefix('#').unwrap_or(arg);
        let index: u32 = digits
            .parse()
            .with_context(|| format!("'{arg}' is not a word index"))?;
        match self.lexicon.id_at(index) {
            Some(id) => Ok(id),
            None => bail!("no word #{index}"),
        }
    }

    fn words(&self, args: &[String]) -> anyhow::Result<Vec<WordId>> {
        args.iter().map(|arg| self.word(arg)).collect()
    }

    fn family_index(&self, name: &str) -> anyhow::Result<usize> {
        match self.families.iter().position(|f| f.name() == name) {
            Some(index) => Ok(index),
            None => bail!("no family named '{name}'"),
        }
    }

    fn describe(&self, id: WordId) -> String {
        format!("{id} {}", self.lexicon.label(id).unwrap_or("?"))
    }
}

pub fn word(root: &Path, config: &LineageConfig, label: String) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    let id = bench.lexicon.insert(label);
    bench.save()?;
    println!("{}", bench.describe(id));
    Ok(())
}

pub fn link(
    root: &Path,
    config: &LineageConfig,
    parent: &str,
    children: &[String],
) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    let parent = bench.word(parent)?;
    let children = bench.words(children)?;
    let created = bench.lexicon.connect_many(parent, children)?;
    bench.save()?;
    println!("{created} link(s) created");
    Ok(())
}

pub fn unlink(root: &Path, config: &LineageConfig, a: &str, b: &str) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    let (a, b) = (bench.word(a)?, bench.word(b)?);
    let removed = bench.lexicon.disconnect(a, b)?;
    bench.save()?;
    println!("{removed} link(s) removed");
    Ok(())
}

pub fn isolate(root: &Path, config: &LineageConfig, word: &str) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    let word = bench.word(word)?;
    let removed = bench.lexicon.disconnect_all(word)?;
    bench.save()?;
    println!("{removed} link(s) removed");
    Ok(())
}

pub fn family(root: &Path, config: &LineageConfig, name: String) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    if bench.family_index(&name).is_ok() {
        bail!("family '{name}' already exists");
    }
    bench
        .families
        .push(Family::with_event_capacity(name.clone(), config.events.capacity));
    bench.save()?;
    println!("created family '{name}'");
    Ok(())
}

pub fn rename(
    root: &Path,
    config: &LineageConfig,
    family: &str,
    name: String,
) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    if name != family && bench.family_index(&name).is_ok() {
        bail!("family '{name}' already exists");
    }
    let index = bench.family_index(family)?;
    let mut rx = bench.families[index].subscribe();
    bench.families[index].rename(name.clone());
    log_changes(&mut rx);
    bench.save()?;
    println!("renamed '{family}' to '{name}'");
    Ok(())
}

pub fn add(
    root: &Path,
    config: &LineageConfig,
    family: &str,
    words: &[String],
) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    let index = bench.family_index(family)?;
    let words = bench.words(words)?;
    let mut rx = bench.families[index].subscribe();
    let added = bench.families[index].add_words(&bench.lexicon, words)?;
    log_changes(&mut rx);
    bench.save()?;
    println!("{added} word(s) added to '{family}'");
    Ok(())
}

pub fn remove(
    root: &Path,
    config: &LineageConfig,
    family: &str,
    words: &[String],
) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    let index = bench.family_index(family)?;
    let words = bench.words(words)?;
    let mut rx = bench.families[index].subscribe();
    let removed = bench.families[index].remove_words(&mut bench.lexicon, words)?;
    log_changes(&mut rx);
    bench.save()?;
    println!("{removed} word(s) removed from '{family}'");
    Ok(())
}

pub fn sort(root: &Path, config: &LineageConfig, family: &str) -> anyhow::Result<()> {
    let mut bench = Workbench::open(root, config)?;
    let index = bench.family_index(family)?;
    let mut rx = bench.families[index].subscribe();

    match bench.families[index].sort(&bench.lexicon) {
        Ok(()) => {
            log_changes(&mut rx);
            bench.save()?;
            for (position, &word) in bench.families[index].order().iter().enumerate() {
                println!("{}. {}", position + 1, bench.describe(word));
            }
            Ok(())
        }
        Err(LineageError::CycleDetected { problem_words }) => {
            println!("cycle detected in '{family}'; these words never became ready:");
            for &word in &problem_words {
                println!("  {}", bench.describe(word));
            }
            bail!("'{family}' cannot be sorted")
        }
        Err(err) => Err(err.into()),
    }
}

pub fn show(root: &Path, config: &LineageConfig) -> anyhow::Result<()> {
    let bench = Workbench::open(root, config)?;
    print!("{}", render(&bench.lexicon, &bench.families));
    Ok(())
}

pub fn clear(root: &Path, config: &LineageConfig) -> anyhow::Result<()> {
    let path = config.snapshot_path(root);
    tracing::info!("Clearing snapshot: {}", path.display());

    lineage_core::clear_snapshot(root, &path)?;

    println!("snapshot cleared");
    Ok(())
}

/// Report queued family changes the way a bound view would receive them.
fn log_changes(rx: &mut FamilyReceiver) {
    while let Ok(event) = rx.try_recv() {
        tracing::debug!(sequence = event.sequence, change = ?event.change, "family changed");
    }
}

/// Words with their children, then families in their stored order.
fn render(lexicon: &Lexicon, families: &[Family]) -> String {
    let describe = |id: WordId| format!("{id} {}", lexicon.label(id).unwrap_or("?"));
    let mut out = String::new();

    let _ = writeln!(out, "words:");
    for word in lexicon.words() {
        let children = lexicon.children(word.id).unwrap_or_default();
        if children.is_empty() {
            let _ = writeln!(out, "  {}", describe(word.id));
        } else {
            let targets: Vec<String> = children.iter().map(|c| c.to_string()).collect();
            let _ = writeln!(out, "  {} -> {}", describe(word.id), targets.join(", "));
        }
    }

    let _ = writeln!(out, "families:");
    for family in families {
        let members: Vec<String> = family.order().iter().map(|&w| describe(w)).collect();
        let _ = writeln!(out, "  {}: [{}]", family.name(), members.join(", "));
    }
    out
}
