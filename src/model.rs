use std::{fs, io::Write, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    hmm::{options::DecodeOptions, trainer::Trainer, HmmModel},
    mfc::{MfcTable, MfcTagger},
    quark::StringTable,
    tagger::{Tagger, END, START},
    Error, Result,
};

/// Which of the two taggers a [`Model`] should hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaggerKind {
    #[default]
    Hmm,
    Baseline,
}

/// Everything training produces: the HMM and the baseline table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub hmm: HmmModel,
    pub mfc: MfcTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Bson,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("bson") => Self::Bson,
            _ => Self::Json,
        }
    }
}

impl Model {
    pub fn from_trainer(trainer: &Trainer) -> Result<Self> {
        Ok(Self { hmm: trainer.train()?, mfc: trainer.mfc_table() })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let buffer = fs::read(path)?;
        let model = Self::from_memory(&buffer, Format::of(path))?;
        log::info!(
            "loaded model {} (tags: {}, words: {})",
            path.display(),
            model.hmm.tags().len(),
            model.mfc.len()
        );
        Ok(model)
    }

    fn from_memory(buffer: &[u8], format: Format) -> Result<Self> {
        match format {
            Format::Json => serde_json::from_slice(buffer).map_err(|e| Error::InvalidModel(e.to_string())),
            Format::Bson => bson::from_slice(buffer).map_err(|e| Error::InvalidModel(e.to_string())),
        }
    }

    pub fn to_bytes(&self, bson: bool) -> Result<Vec<u8>> {
        if bson {
            bson::to_vec(self).map_err(|e| Error::InvalidModel(e.to_string()))
        } else {
            Ok(serde_json::to_vec(self)?)
        }
    }

    /// Writes the model; a `.bson` extension selects BSON, anything else JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let buffer = self.to_bytes(Format::of(path) == Format::Bson)?;
        fs::write(path, buffer)?;
        log::info!("write model to {}", path.display());
        Ok(())
    }

    pub fn tagger(&self, kind: TaggerKind, options: DecodeOptions) -> Box<dyn Tagger + '_> {
        match kind {
            TaggerKind::Hmm => Box::new(self.hmm.decoder(options)),
            TaggerKind::Baseline => Box::new(MfcTagger::new(&self.mfc)),
        }
    }

    /// Writes a readable listing of the model.
    pub fn dump<W: Write>(&self, mut w: W) -> Result<()> {
        let tags = self.hmm.tags();
        writeln!(w, "TAGS = {{")?;
        for (i, tag) in tags.iter().enumerate() {
            writeln!(w, "  {i:5}: {tag}")?;
        }
        writeln!(w, "}}")?;

        writeln!(w, "TRANSITIONS = {{")?;
        let table = self.hmm.transition().table();
        for given in table.givens() {
            if let Some(row) = table.row(given) {
                for (tag, p) in row {
                    writeln!(w, "  ({given} --> {tag}): {p:.6}")?;
                }
            }
        }
        writeln!(w, "}}")?;

        writeln!(w, "EMISSIONS = {{")?;
        let table = self.hmm.emission().table();
        for tag in tags.iter() {
            let n = table.row(tag).map_or(0, |r| r.len());
            writeln!(w, "  {tag}: {n} words")?;
        }
        writeln!(w, "}}")?;
        writeln!(w, "BASELINE = {} words", self.mfc.len())?;
        writeln!(w, "SENTINELS = {START} {END}")?;
        Ok(())
    }
}
