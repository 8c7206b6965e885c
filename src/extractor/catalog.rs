use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::{LastField, SumField};

/// Fixed or exponential numeric literal, e.g. `12`, `0.5`, `1.25e+03`, `-4e-2`.
const NUM: &str = r"([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)";

/// Destination of one captured number.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Target {
    /// Added to a running total.
    Sum(SumField),
    /// Overwrites the previous value.
    Last(LastField),
    /// Captured for anchoring only.
    Ignore,
}

/// Static description of a line matcher.
struct PatternDef {
    name: &'static str,
    /// Regex template; every `{n}` becomes a numeric capture group.
    template: &'static str,
    captures: &'static [Target],
    /// Summed fields incremented by one for every matching line.
    counters: &'static [SumField],
}

/// Compiled catalog entry.
pub(crate) struct Pattern {
    pub(crate) name: &'static str,
    pub(crate) regex: Regex,
    pub(crate) captures: &'static [Target],
    pub(crate) counters: &'static [SumField],
}

const DEFS: &[PatternDef] = &[
    PatternDef {
        name: "branch_and_bound",
        template: r"Explored {n} nodes \({n} simplex iterations\) in {n} seconds",
        captures: &[
            Target::Sum(SumField::Nodes),
            Target::Sum(SumField::SimplexIterations),
            Target::Sum(SumField::OptimizeTime),
        ],
        counters: &[],
    },
    PatternDef {
        name: "final_bounds",
        template: r"Best objective {n}, best bound {n}, gap {n}%",
        captures: &[
            Target::Last(LastField::PrimalBound),
            Target::Last(LastField::DualBound),
            Target::Last(LastField::Gap),
        ],
        counters: &[],
    },
    PatternDef {
        name: "root_relaxation",
        template: r"Root relaxation: objective {n}, {n} iterations, {n} seconds",
        captures: &[
            Target::Last(LastField::RootValue),
            Target::Sum(SumField::RootIterations),
            Target::Sum(SumField::RootTime),
        ],
        counters: &[],
    },
    PatternDef {
        name: "presolved_size",
        template: r"Presolved: {n} rows, {n} columns, {n} nonzeros",
        captures: &[
            Target::Last(LastField::RowsPresolved),
            Target::Last(LastField::ColsPresolved),
            Target::Last(LastField::NonzerosPresolved),
        ],
        counters: &[],
    },
    PatternDef {
        name: "original_size",
        template: r"Optimize a model with {n} rows, {n} columns and {n} nonzeros",
        captures: &[
            Target::Last(LastField::RowsOrig),
            Target::Last(LastField::ColsOrig),
            Target::Last(LastField::NonzerosOrig),
        ],
        counters: &[],
    },
    PatternDef {
        name: "variable_types",
        template: r"Variable types: {n} continuous, {n} integer \({n} binary\)",
        captures: &[
            Target::Last(LastField::ContVars),
            Target::Ignore,
            Target::Last(LastField::BinVars),
        ],
        counters: &[],
    },
    PatternDef {
        name: "read_time",
        template: r"Read problem in {n} seconds",
        captures: &[Target::Last(LastField::ReadTime)],
        counters: &[],
    },
    PatternDef {
        name: "isf_time",
        template: r"Computed ISF in {n} seconds",
        captures: &[Target::Last(LastField::IsfTime)],
        counters: &[],
    },
    PatternDef {
        name: "model_time",
        template: r"Built model in {n} seconds",
        captures: &[Target::Last(LastField::ModelTime)],
        counters: &[],
    },
    PatternDef {
        name: "total_time",
        template: r"Total time was {n} seconds",
        captures: &[Target::Last(LastField::TotalTime)],
        counters: &[],
    },
    PatternDef {
        name: "user_callback",
        template: r"User-callback calls {n}, time in user-callback {n} sec",
        captures: &[
            Target::Last(LastField::CallbackCalls),
            Target::Last(LastField::CallbackTime),
        ],
        counters: &[],
    },
    PatternDef {
        name: "transmission_verify",
        template: r"Verified transmission limits in {n} sec",
        captures: &[Target::Sum(SumField::TransmissionTime)],
        counters: &[SumField::TransmissionCalls],
    },
    PatternDef {
        name: "transmission_overflow",
        template: r"MW overflow",
        captures: &[],
        counters: &[SumField::TransmissionCount],
    },
];

/// Compiled pattern catalog, built once per process.
pub(crate) static CATALOG: Lazy<Vec<Pattern>> = Lazy::new(|| {
    DEFS
        .iter()
        .map(|def| Pattern {
            name: def.name,
            regex: Regex::new(&def.template.replace("{n}", NUM))
                .expect("catalog templates are valid regexes"),
            captures: def.captures,
            counters: def.counters,
        })
        .collect()
});
