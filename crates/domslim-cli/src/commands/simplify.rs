//! Simplify command
//!
//! Usage: domslim simplify <SNAPSHOT> [--output <FILE>] [--profile <PROFILE>]
//!        [--max-visits <N>] [--quiet-matches]

use clap::Args;
use std::path::PathBuf;
use std::rc::Rc;

use domslim_core::logging_facility::{self, Profile};
use domslim_core::traversal::subtree_len;
use domslim_core::{
    basic_rule_set, deep_clone_with_references, Classifier, LayoutClassifier, Simplifier,
    SimplifyOptions,
};

#[derive(Debug, Args)]
pub struct SimplifyArgs {
    /// Page snapshot (JSON)
    pub snapshot: PathBuf,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Logging profile: dev or prod
    #[arg(long, default_value = "dev")]
    pub profile: Profile,

    /// Abort if any node is re-entered more than N times
    #[arg(long, value_name = "N")]
    pub max_visits: Option<u32>,

    /// Do not log individual rule matches
    #[arg(long)]
    pub quiet_matches: bool,
}

/// Execute simplify command
pub fn execute(args: SimplifyArgs) -> Result<(), Box<dyn std::error::Error>> {
    logging_facility::init(args.profile);

    let page = super::load_snapshot(&args.snapshot)?;

    // Rules mutate a clone; the classifier keeps answering about the source
    let (mut working, root) = deep_clone_with_references(&page.document, page.root)?;
    let classifier: Rc<dyn Classifier> =
        Rc::new(LayoutClassifier::new(page.document, page.layout));
    let rules = basic_rule_set(classifier);
    let nodes_before = subtree_len(&working, root)?;

    let outcome = Simplifier::new(&rules)
        .with_options(SimplifyOptions {
            max_visits_per_node: args.max_visits,
            log_matches: !args.quiet_matches,
        })
        .run(&mut working, root)?;

    tracing::info!(
        snapshot = %args.snapshot.display(),
        nodes_before,
        nodes_after = subtree_len(&working, outcome.root)?,
        visited = outcome.stats.visited,
        removed = outcome.stats.removed(),
        unfolded = outcome.stats.unfolded,
        "simplified snapshot"
    );

    let markup = domslim_core::render::to_markup(&working, outcome.root)?;
    super::emit(&markup, args.output, "Simplified")?;
    Ok(())
}
