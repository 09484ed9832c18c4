use std::str::FromStr;

use crate::parsers::xml_tree::{parse_tree, DocumentError, Element};

const TEST_CASE_ELEMENT: &str = "TestCase";
const BENCHMARK_RESULTS_ELEMENT: &str = "BenchmarkResults";
const MEAN_ELEMENT: &str = "mean";

/// One downloaded benchmark result file, parsed into an element tree.
///
/// The expected layout is the Catch2 XML reporter output:
///
/// ```xml
/// <Catch2TestRun>
///   <TestCase name="Sort">
///     <BenchmarkResults name="sort 1000">
///       <mean value="42.5" lowerBound="40.1" upperBound="45.0"/>
///     </BenchmarkResults>
///   </TestCase>
/// </Catch2TestRun>
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RawDocument {
    root: Element,
}

/// A `TestCase` element carrying a `name` attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestCaseRecord<'a> {
    pub name: &'a str,
    pub mean: Option<MeanRecord<'a>>,
}

/// The first `mean` element nested in a `BenchmarkResults` element of a test case
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanRecord<'a> {
    pub value: Option<&'a str>,
}

impl RawDocument {
    pub fn new(root: Element) -> Self {
        RawDocument { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All named test cases in document order. Test cases without a `name`
    /// attribute are left out.
    pub fn test_cases(&self) -> impl Iterator<Item = TestCaseRecord<'_>> {
        self.root
            .elements_named(TEST_CASE_ELEMENT)
            .filter_map(|test_case| {
                let name = test_case.attribute("name")?;
                let mean = first_mean(test_case, false).map(|mean| MeanRecord {
                    value: mean.attribute("value"),
                });
                Some(TestCaseRecord { name, mean })
            })
    }
}

impl FromStr for RawDocument {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tree(s).map(RawDocument::new)
    }
}

/// Pre-order search for a `mean` element that has a `BenchmarkResults` ancestor
/// within the searched subtree.
fn first_mean(element: &Element, inside_results: bool) -> Option<&Element> {
    if inside_results && element.name == MEAN_ELEMENT {
        return Some(element);
    }
    let inside_results = inside_results || element.name == BENCHMARK_RESULTS_ELEMENT;
    element
        .children
        .iter()
        .find_map(|child| first_mean(child, inside_results))
}
