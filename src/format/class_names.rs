//! Utility class merging for styled views.
//!
//! Later classes win over earlier ones that set the same style property, the
//! way utility-first stylesheets expect: `merge_class_names([Some("p-2 text-sm"),
//! Some("p-4")])` yields `"text-sm p-4"`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Style property groups, matched in order against a class's base utility.
static CLASS_GROUPS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        (
            "display",
            r"^(block|inline-block|inline|flex|inline-flex|grid|inline-grid|table|contents|hidden)$",
        ),
        ("position", r"^(static|fixed|absolute|relative|sticky)$"),
        ("visibility", r"^(visible|invisible|collapse)$"),
        ("overflow", r"^overflow-(auto|hidden|clip|visible|scroll)$"),
        ("flex-direction", r"^flex-(row|row-reverse|col|col-reverse)$"),
        ("flex-wrap", r"^flex-(wrap|wrap-reverse|nowrap)$"),
        ("flex", r"^flex-(1|auto|initial|none)$"),
        ("justify", r"^justify-(normal|start|end|center|between|around|evenly|stretch)$"),
        ("items", r"^items-(start|end|center|baseline|stretch)$"),
        ("gap-x", r"^gap-x-"),
        ("gap-y", r"^gap-y-"),
        ("gap", r"^gap-"),
        ("px", r"^px-"),
        ("py", r"^py-"),
        ("pt", r"^pt-"),
        ("pr", r"^pr-"),
        ("pb", r"^pb-"),
        ("pl", r"^pl-"),
        ("p", r"^p-"),
        ("mx", r"^mx-"),
        ("my", r"^my-"),
        ("mt", r"^mt-"),
        ("mr", r"^mr-"),
        ("mb", r"^mb-"),
        ("ml", r"^ml-"),
        ("m", r"^m-"),
        ("min-w", r"^min-w-"),
        ("max-w", r"^max-w-"),
        ("min-h", r"^min-h-"),
        ("max-h", r"^max-h-"),
        ("w", r"^w-"),
        ("h", r"^h-"),
        ("font-size", r"^text-(xs|sm|base|lg|[2-9]?xl|\[\d.*\])$"),
        ("text-align", r"^text-(left|center|right|justify|start|end)$"),
        ("text-color", r"^text-"),
        (
            "font-weight",
            r"^font-(thin|extralight|light|normal|medium|semibold|bold|extrabold|black)$",
        ),
        ("font-family", r"^font-"),
        ("leading", r"^leading-"),
        ("tracking", r"^tracking-"),
        ("bg-color", r"^bg-"),
        ("rounded", r"^rounded(-(none|sm|md|lg|xl|2xl|3xl|full|\[.+\]))?$"),
        ("border-width", r"^border(-(0|2|4|8|\[\d.*\]))?$"),
        ("border-color", r"^border-"),
        ("shadow", r"^shadow(-(sm|md|lg|xl|2xl|inner|none))?$"),
        ("opacity", r"^opacity-"),
        ("z", r"^z-"),
    ]
    .into_iter()
    .map(|(group, pattern)| {
        (
            group,
            Regex::new(pattern).expect("Invalid class group regex"),
        )
    })
    .collect()
});

/// Groups made redundant by a later class of the key group.
fn overridden_groups(group: &str) -> &'static [&'static str] {
    match group {
        "p" => &["px", "py", "pt", "pr", "pb", "pl"],
        "px" => &["pr", "pl"],
        "py" => &["pt", "pb"],
        "m" => &["mx", "my", "mt", "mr", "mb", "ml"],
        "mx" => &["mr", "ml"],
        "my" => &["mt", "mb"],
        "gap" => &["gap-x", "gap-y"],
        _ => &[],
    }
}

/// One class split into its variant prefix, importance and base utility.
struct ParsedClass<'a> {
    variants: String,
    important: bool,
    base: &'a str,
}

impl<'a> ParsedClass<'a> {
    fn parse(class: &'a str) -> Self {
        // Split on the last `:` outside arbitrary-value brackets.
        let mut depth = 0usize;
        let mut split = None;
        for (i, ch) in class.char_indices() {
            match ch {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => split = Some(i),
                _ => {}
            }
        }

        let (variants, rest) = match split {
            Some(i) => (&class[..i], &class[i + 1..]),
            None => ("", class),
        };
        // Variant order does not change meaning.
        let mut variants: Vec<&str> = variants.split(':').filter(|v| !v.is_empty()).collect();
        variants.sort_unstable();

        let (important, base) = match rest.strip_prefix('!') {
            Some(base) => (true, base),
            None => (false, rest),
        };
        let base = base.strip_prefix('-').unwrap_or(base);

        Self {
            variants: variants.join(":"),
            important,
            base,
        }
    }

    fn group(&self) -> Option<&'static str> {
        CLASS_GROUPS
            .iter()
            .find(|(_, pattern)| pattern.is_match(self.base))
            .map(|(group, _)| *group)
    }

    fn property_id(&self, group: &str) -> String {
        format!(
            "{}|{}|{}",
            self.variants,
            if self.important { "!" } else { "" },
            group
        )
    }
}

/// Merge any number of optional, whitespace-separated class lists.
///
/// Missing and empty inputs are skipped. When two classes set the same style
/// property under the same variants, only the later one survives. Unknown
/// classes are kept.
pub fn merge_class_names<I, S>(inputs: I) -> String
where
    I: IntoIterator<Item = Option<S>>,
    S: AsRef<str>,
{
    let inputs: Vec<S> = inputs.into_iter().flatten().collect();
    let classes: Vec<&str> = inputs
        .iter()
        .flat_map(|input| input.as_ref().split_whitespace())
        .collect();

    let mut seen: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::with_capacity(classes.len());

    for class in classes.into_iter().rev() {
        let parsed = ParsedClass::parse(class);
        let id = match parsed.group() {
            Some(group) => {
                let id = parsed.property_id(group);
                if seen.contains(&id) {
                    continue;
                }
                for overridden in overridden_groups(group) {
                    seen.insert(parsed.property_id(overridden));
                }
                id
            }
            None => format!("raw|{}", class),
        };
        if seen.insert(id) {
            kept.push(class);
        }
    }

    kept.reverse();
    kept.join(" ")
}

/// Anything `cn!` accepts as one class list.
pub trait ClassInput {
    fn class_str(&self) -> Option<&str>;
}

impl ClassInput for str {
    fn class_str(&self) -> Option<&str> {
        Some(self)
    }
}

impl ClassInput for String {
    fn class_str(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: ClassInput + ?Sized> ClassInput for &T {
    fn class_str(&self) -> Option<&str> {
        (**self).class_str()
    }
}

impl<T: ClassInput> ClassInput for Option<T> {
    fn class_str(&self) -> Option<&str> {
        self.as_ref().and_then(ClassInput::class_str)
    }
}

/// Merge class lists of mixed types.
///
/// ```ignore
/// use green_plate::cn;
///
/// let selected = true;
/// let classes = cn!("rounded p-2", selected.then_some("bg-green-600"), None::<&str>);
/// assert_eq!(classes, "rounded p-2 bg-green-600");
/// ```
#[macro_export]
macro_rules! cn {
    ($($input:expr),* $(,)?) => {
        $crate::format::merge_class_names([
            $($crate::format::ClassInput::class_str(&$input)),*
        ])
    };
}
