//! Query-by-example matching of a data set against filter elements.

use crate::mem::DataSet;
use dcmio_core::error::{AmbiguousFilterSnafu, Result, VrMismatchSnafu};
use dcmio_core::tag::tags;
use dcmio_core::value::Value;
use dcmio_core::vr::VR;
use dcmio_core::DataElement;
use snafu::ensure;

/// Match one filter element against a data set.
///
/// Returns whether the filter matches and, when it does, the stored element
/// it matched on (if any). `QueryRetrieveLevel` and `SpecificCharacterSet`
/// filters match unconditionally, as does a filter with no values
/// (the universal match). For UID filters, any filter value matching any
/// stored value suffices; for every other VR the filter must carry exactly
/// one value equal to some stored value. A VR disagreement between the
/// filter and the stored element is a protocol error.
pub fn query<'a>(
    data_set: &'a DataSet,
    filter: &DataElement,
) -> Result<(bool, Option<&'a DataElement>)> {
    if filter.tag() == tags::QUERY_RETRIEVE_LEVEL || filter.tag() == tags::SPECIFIC_CHARACTER_SET {
        return Ok((true, None));
    }
    let element = data_set.element(filter.tag()).ok();
    match query_element(element, filter)? {
        true => Ok((true, element)),
        false => Ok((false, None)),
    }
}

fn query_element(element: Option<&DataElement>, filter: &DataElement) -> Result<bool> {
    if filter.value().is_empty() {
        // universal match
        return Ok(true);
    }
    if filter.vr() == VR::SQ {
        // sequence matching is not implemented; everything passes
        return Ok(true);
    }
    let Some(element) = element else {
        return Ok(false);
    };
    ensure!(
        filter.vr() == element.vr(),
        VrMismatchSnafu {
            tag: filter.tag(),
            stream: filter.vr(),
            dictionary: element.vr(),
        }
    );
    if filter.vr() == VR::UI {
        // any filter UID may match any stored UID
        let expected = filter.strings()?;
        let stored = element.strings()?;
        return Ok(expected.iter().any(|uid| stored.contains(uid)));
    }
    ensure!(
        filter.value().multiplicity() == 1,
        AmbiguousFilterSnafu { tag: filter.tag() }
    );
    Ok(contains_single(filter.value(), element.value()))
}

/// Whether the single value of `filter` equals some value of `stored`.
fn contains_single(filter: &Value, stored: &Value) -> bool {
    match (filter, stored) {
        (Value::Strs(f), Value::Strs(s)) => s.contains(&f[0]),
        (Value::U16s(f), Value::U16s(s)) => s.contains(&f[0]),
        (Value::U32s(f), Value::U32s(s)) => s.contains(&f[0]),
        (Value::I16s(f), Value::I16s(s)) => s.contains(&f[0]),
        (Value::I32s(f), Value::I32s(s)) => s.contains(&f[0]),
        (Value::F32s(f), Value::F32s(s)) => s.contains(&f[0]),
        (Value::F64s(f), Value::F64s(s)) => s.contains(&f[0]),
        (Value::Tags(f), Value::Tags(s)) => s.contains(&f[0]),
        _ => false,
    }
}
