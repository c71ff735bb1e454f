//! Static keyword table for the weighted topic scorer.
//!
//! Tier 1 entries are the most specific signals and are declared first;
//! tie scores resolve to the earliest entry, so ordering here is part of
//! the contract, not an accident of map iteration.

use crate::types::Topic;

pub struct TopicKeywords {
    pub topic: Topic,
    pub keywords: &'static [&'static str],
    pub weight: f64,
    pub tier: u8,
}

pub const KEYWORD_TABLE: &[TopicKeywords] = &[
    TopicKeywords {
        topic: Topic::Inequalities,
        keywords: &[
            "<", ">", "≤", "≥", "<=", ">=", "inequality", "inequalities", "less than",
            "greater than", "at most", "at least", "no more than",
        ],
        weight: 2.5,
        tier: 1,
    },
    TopicKeywords {
        topic: Topic::SystemsOfEquations,
        keywords: &[
            "system of equations", "systems of equations", "substitution method",
            "elimination method", "simultaneous", "two equations", "two unknowns",
            "both equations",
        ],
        weight: 2.5,
        tier: 1,
    },
    TopicKeywords {
        topic: Topic::Trigonometry,
        keywords: &[
            "sin", "cos", "tan", "sine", "cosine", "tangent", "radians", "degrees",
            "unit circle", "angle of elevation", "angle of depression",
        ],
        weight: 2.5,
        tier: 1,
    },
    TopicKeywords {
        topic: Topic::Calculus,
        keywords: &[
            "derivative", "integral", "limit", "differentiate", "integrate",
            "rate of change", "tangent line", "antiderivative", "d/dx", "dy/dx",
        ],
        weight: 2.5,
        tier: 1,
    },
    TopicKeywords {
        topic: Topic::QuadraticEquations,
        keywords: &[
            "quadratic", "x^2", "x²", "parabola", "discriminant", "complete the square",
            "quadratic formula", "vertex", "roots",
        ],
        weight: 2.0,
        tier: 2,
    },
    TopicKeywords {
        topic: Topic::Radicals,
        keywords: &["square root", "cube root", "radical", "sqrt", "√", "rationalize"],
        weight: 2.0,
        tier: 2,
    },
    TopicKeywords {
        topic: Topic::Exponents,
        keywords: &[
            "exponent", "power of", "exponential", "logarithm", "log base",
            "scientific notation",
        ],
        weight: 2.0,
        tier: 2,
    },
    TopicKeywords {
        topic: Topic::RationalExpressions,
        keywords: &[
            "rational expression", "common denominator", "numerator", "denominator",
            "simplify the fraction", "complex fraction",
        ],
        weight: 2.0,
        tier: 2,
    },
    TopicKeywords {
        topic: Topic::Factoring,
        keywords: &[
            "factor", "factoring", "factorize", "gcf", "greatest common factor",
            "difference of squares",
        ],
        weight: 1.5,
        tier: 3,
    },
    TopicKeywords {
        topic: Topic::Polynomials,
        keywords: &["polynomial", "degree of", "binomial", "trinomial", "foil", "expand"],
        weight: 1.5,
        tier: 3,
    },
    TopicKeywords {
        topic: Topic::Functions,
        keywords: &[
            "function", "f(x)", "g(x)", "domain", "range", "inverse function",
            "composition",
        ],
        weight: 1.5,
        tier: 3,
    },
    TopicKeywords {
        topic: Topic::Graphing,
        keywords: &[
            "graph", "plot", "coordinate", "x-axis", "y-axis", "intercept",
            "slope-intercept", "quadrant",
        ],
        weight: 1.5,
        tier: 3,
    },
    TopicKeywords {
        topic: Topic::Geometry,
        keywords: &[
            "triangle", "circle", "area", "perimeter", "volume", "angle", "polygon",
            "rectangle", "radius", "hypotenuse", "congruent",
        ],
        weight: 1.5,
        tier: 3,
    },
    TopicKeywords {
        topic: Topic::WordProblems,
        keywords: &[
            "how many", "how much", "total cost", "altogether", "per hour", "miles",
            "dollars", "apples", "tickets",
        ],
        weight: 1.0,
        tier: 4,
    },
    TopicKeywords {
        topic: Topic::LinearEquations,
        keywords: &[
            "solve", "equation", "solve for x", "linear", "slope", "variable",
            "unknown", "isolate",
        ],
        weight: 1.0,
        tier: 4,
    },
];

pub fn priority_boost(tier: u8) -> f64 {
    match tier {
        1 => 3.0,
        2 => 2.0,
        _ => 1.0,
    }
}
