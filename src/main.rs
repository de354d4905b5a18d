use std::{
    fs::File,
    io::{stdout, BufReader, Write},
    path::PathBuf,
};

use clap::{Parser, Subcommand};
use postagger::{dataset::read_tags, evaluate_tagger, Corpus, DecodeOptions, Evaluation, Model, TaggerKind, Trainer};

#[derive(Debug, Parser)]
#[command(version)]
#[command(propagate_version = true)]
struct Argv {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a model from tagged corpora (CORPUS)
    Train {
        /// write the model to a file (MODEL); a .bson extension selects BSON
        #[arg(short, long, value_name = "MODEL")]
        model: PathBuf,
        /// decoder parameter used for the held-out evaluation (name=value)
        #[arg(short = 'p', value_name = "NAME=VALUE")]
        parameters: Vec<String>,
        /// warn about corpus tags missing from this tag set file
        #[arg(long, value_name = "FILE")]
        tags: Option<PathBuf>,
        /// share of sentences used for training; the rest is held out
        #[arg(long, default_value_t = 1.0)]
        split: f64,
        #[arg(required = true, value_name = "CORPUS")]
        datasets: Vec<PathBuf>,
    },
    /// Assign tags to the sentences in the data sets given by files (FILE)
    Tag {
        /// read a model from a file (MODEL)
        #[arg(short, long, required = true, value_name = "MODEL")]
        model: PathBuf,
        /// report the performance of the model on the data
        #[arg(short = 't', long = "test")]
        evaluate: bool,
        /// output the reference tags in the input data
        #[arg(short, long)]
        reference: bool,
        /// output the log probability of each tag sequence
        #[arg(short = 'P', long)]
        probability: bool,
        /// suppress tagging results (useful for test mode)
        #[arg(short, long)]
        quiet: bool,
        /// use the most-frequent-class baseline instead of the HMM
        #[arg(long)]
        baseline: bool,
        /// decoder parameter (name=value)
        #[arg(short = 'p', value_name = "NAME=VALUE")]
        parameters: Vec<String>,
        #[arg(required = true, value_name = "FILE")]
        datasets: Vec<PathBuf>,
    },
    /// Output the model stored in the file (MODEL) in a plain-text format
    Dump {
        #[arg(short, long, required = true, value_name = "MODEL")]
        model: PathBuf,
    },
}

fn read_corpora(paths: &[PathBuf]) -> Corpus {
    let mut corpus = Corpus::default();
    for fpath in paths {
        let part = Corpus::from_path(fpath).unwrap_or_else(|e| panic!("failed to read {}: {e}", fpath.display()));
        corpus.extend(part).expect("failed to merge corpora");
    }
    corpus
}

fn train(model: PathBuf, parameters: Vec<String>, tags: Option<PathBuf>, split: f64, datasets: Vec<PathBuf>) {
    let options = DecodeOptions::from_params(&parameters).expect("invalid parameter");
    let corpus = read_corpora(&datasets);
    if let Some(fpath) = tags {
        let f = File::open(&fpath).expect("failed to open tag set file");
        let tagset = read_tags(BufReader::new(f)).expect("failed to read tag set file");
        for tag in corpus.tagset().into_iter().filter(|t| !tagset.contains(*t)) {
            log::warn!("tag {tag} is not in {}", fpath.display());
        }
    }
    let (train_set, test_set) = corpus.split(split).expect("invalid split");
    println!("There are {} sentences in the corpus.", corpus.len());
    println!("There are {} sentences in the training set.", train_set.len());
    println!("There are {} sentences in the testing set.", test_set.len());

    let mut trainer = Trainer::new();
    trainer.append_corpus(&train_set).expect("failed to append corpus");
    let m = Model::from_trainer(&trainer).expect("failed to train");
    m.save(&model).expect("failed to write model");

    if !test_set.is_empty() {
        let unseen = test_set.vocab().difference(&train_set.vocab()).count();
        println!("There are {unseen} words in the test set that are missing in the training set.");
        for (name, kind) in [("HMM", TaggerKind::Hmm), ("MFC", TaggerKind::Baseline)] {
            let tagger = m.tagger(kind, options);
            let mut evaluation = evaluate_tagger(tagger.as_ref(), &test_set).expect("failed to evaluate");
            let est = evaluation.evaluate();
            println!("{name} accuracy: {:.2}%", 100.0 * est.accuracy);
            log::info!("{name} evaluation:\n{evaluation}");
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn tag(
    model: PathBuf,
    evaluate: bool,
    reference: bool,
    probability: bool,
    quiet: bool,
    baseline: bool,
    parameters: Vec<String>,
    datasets: Vec<PathBuf>,
) {
    let options = DecodeOptions::from_params(&parameters).expect("invalid parameter");
    let m = Model::from_file(&model).expect("failed to load model");
    let kind = if baseline { TaggerKind::Baseline } else { TaggerKind::Hmm };
    let tagger = m.tagger(kind, options);
    let mut evaluation = Evaluation::default();
    let mut out = stdout().lock();
    for fpath in datasets {
        let corpus = Corpus::from_path(&fpath).expect("failed to open the stream for the input data");
        for (key, sentence) in corpus.iter() {
            let decoded = evaluation.tag_sentence(tagger.as_ref(), key, sentence).expect("failed to tag");
            let Some(decoded) = decoded else { continue };
            if quiet {
                continue;
            }
            if probability {
                writeln!(out, "@probability\t{}", decoded.log_prob).expect("failed to write");
            }
            for (i, (word, pred)) in sentence.words().iter().zip(decoded.tags()).enumerate() {
                if reference {
                    writeln!(out, "{word}\t{}\t{pred}", sentence.tags()[i]).expect("failed to write");
                } else {
                    writeln!(out, "{word}\t{pred}").expect("failed to write");
                }
            }
            writeln!(out).expect("failed to write");
        }
    }
    if evaluate {
        evaluation.evaluate();
        println!("{}", evaluation);
    }
}

fn main() {
    env_logger::init();
    let argv = Argv::parse();
    log::info!("argv: {:?}", argv);
    match argv.command {
        Command::Train { model, parameters, tags, split, datasets } => train(model, parameters, tags, split, datasets),
        Command::Tag { model, evaluate, reference, probability, quiet, baseline, parameters, datasets } => {
            tag(model, evaluate, reference, probability, quiet, baseline, parameters, datasets)
        }
        Command::Dump { model } => {
            let m = Model::from_file(&model).expect("failed to load model");
            m.dump(stdout().lock()).expect("failed to dump model");
        }
    }
}
