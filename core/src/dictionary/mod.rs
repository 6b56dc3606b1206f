//! The standard attribute dictionary.
//!
//! The table is embedded as tab-separated rows of
//! `(tag, VR, name, VM, version)` and indexed once, on first use, into
//! tag-keyed and name-keyed maps. Lookups for `(gggg,0000)` tags of even
//! groups that are not listed synthesize the generic group length entry.

pub mod uid;

use crate::error::{NoSuchAttributeNameSnafu, Result, TagNotFoundSnafu};
use crate::tag::Tag;
use crate::vr::VR;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::str::FromStr;

const DICT_DATA: &str = include_str!("entries.dic");

/// One dictionary record: the attribute tag, its value representation, its
/// keyword name, and its value multiplicity constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagInfo {
    pub tag: Tag,
    pub vr: VR,
    pub name: &'static str,
    pub vm: &'static str,
}

#[derive(Debug)]
struct Registry {
    by_tag: HashMap<Tag, TagInfo>,
    by_name: HashMap<&'static str, TagInfo>,
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let mut by_tag = HashMap::with_capacity(256);
    let mut by_name = HashMap::with_capacity(256);
    for line in DICT_DATA.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('\t');
        let (Some(tag), Some(vr), Some(name), Some(vm)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            continue;
        };
        // rows with group or element ranges are not supported and skipped
        let Ok(tag) = Tag::from_str(tag) else {
            continue;
        };
        let Ok(vr) = VR::from_str(vr) else {
            continue;
        };
        let info = TagInfo { tag, vr, name, vm };
        by_tag.insert(tag, info);
        by_name.insert(name, info);
    }
    Registry { by_tag, by_name }
});

/// Find the dictionary record of the given tag.
///
/// Unlisted `(gggg,0000)` tags of even groups resolve to the synthetic
/// `UL GenericGroupLength` record; any other unlisted tag is an error.
pub fn lookup_tag(tag: Tag) -> Result<TagInfo> {
    match REGISTRY.by_tag.get(&tag) {
        Some(info) => Ok(*info),
        None if tag.group() % 2 == 0 && tag.element() == 0x0000 => Ok(TagInfo {
            tag,
            vr: VR::UL,
            name: "GenericGroupLength",
            vm: "1",
        }),
        None => TagNotFoundSnafu { tag }.fail(),
    }
}

/// Find the dictionary record carrying the given keyword name.
pub fn lookup_name(name: &str) -> Result<TagInfo> {
    REGISTRY
        .by_name
        .get(name)
        .copied()
        .ok_or_else(|| NoSuchAttributeNameSnafu { name: name.to_owned() }.build())
}

/// Render a tag together with its dictionary name, for diagnostics.
/// Unknown tags render as `(GGGG,EEEE)[??]`.
pub fn tag_debug_string(tag: Tag) -> String {
    match lookup_tag(tag) {
        Ok(info) => format!("{}[{}]", tag, info.name),
        Err(_) => format!("{}[??]", tag),
    }
}
