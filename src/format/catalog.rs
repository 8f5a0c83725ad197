// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in format catalog.
//!
//! Every known format id is catalogued with its descriptor. Formats with an
//! installed codec take their capabilities from the codec; the rest are
//! descriptor-only and fail to open with `CodecUnavailable`.

use crate::codec::formats::{LdeoihFactory, Mgd77Factory, XyzFactory, XyzLayout};
use crate::codec::CodecFactory;
use crate::core::{RecordKind, Result};

use super::descriptor::{ByteOrder, FormatDescriptor, Storage};
use super::registry::RegistryBuilder;

/// What a catalogued format carries.
#[derive(Debug, Clone, Copy)]
enum Content {
    /// Swath bathymetry and/or sidescan with navigation.
    Swath,
    /// Navigation only.
    Nav,
    /// Single soundings or underway profiles.
    Profile,
}

impl Content {
    fn kinds(self) -> &'static [RecordKind] {
        match self {
            Content::Swath => &[
                RecordKind::Comment,
                RecordKind::Survey,
                RecordKind::Nav,
                RecordKind::SensorAux,
                RecordKind::Unsupported,
            ],
            Content::Nav => &[RecordKind::Comment, RecordKind::Nav],
            Content::Profile => &[RecordKind::Comment, RecordKind::Survey],
        }
    }
}

use ByteOrder::{Big, Little, NotApplicable as Na};
use Content::{Nav, Profile, Swath};
use Storage::{Binary, Text};

type Row = (i32, &'static str, &'static str, &'static str, Storage, ByteOrder, Content);

#[rustfmt::skip]
const CATALOG: &[Row] = &[
    (11, "SBSIOMRG", "SeaBeam", "SIO merge SeaBeam", Binary, Big, Swath),
    (12, "SBSIOCEN", "SeaBeam", "SIO centered SeaBeam", Binary, Big, Swath),
    (13, "SBSIOLSI", "SeaBeam", "SIO LSI SeaBeam", Binary, Big, Swath),
    (14, "SBURICEN", "SeaBeam", "URI centered SeaBeam", Binary, Big, Swath),
    (15, "SBURIVAX", "SeaBeam", "URI VAX centered SeaBeam", Binary, Little, Swath),
    (16, "SBSIOSWB", "SeaBeam", "SIO swath-bathy SeaBeam", Binary, Big, Swath),
    (17, "SBIFREMR", "SeaBeam", "IFREMER Archive SeaBeam", Text, Na, Swath),
    (21, "HSATLRAW", "Hydrosweep DS", "Raw Hydrosweep", Text, Na, Swath),
    (22, "HSLDEDMB", "Hydrosweep DS", "EDMB Hydrosweep", Binary, Big, Swath),
    (23, "HSURICEN", "Hydrosweep DS", "URI Hydrosweep", Binary, Big, Swath),
    (24, "HSLDEOIH", "Hydrosweep DS", "L-DEO in-house binary Hydrosweep", Binary, Big, Swath),
    (25, "HSURIVAX", "Hydrosweep DS", "URI Hydrosweep from VAX", Binary, Little, Swath),
    (26, "HSUNKNWN", "Hydrosweep DS", "Hydrosweep DS unknown source", Text, Na, Swath),
    (31, "SB2000RW", "SeaBeam 2000", "SIO Swath-bathy SeaBeam 2000", Text, Na, Swath),
    (32, "SB2000SB", "SeaBeam 2000", "SIO Swath-bathy SeaBeam 2000", Binary, Big, Swath),
    (33, "SB2000SS", "SeaBeam 2000", "SIO Sidescan SeaBeam 2000", Binary, Big, Swath),
    (41, "SB2100RW", "SeaBeam 2100", "SeaBeam 2100 series vendor format", Text, Na, Swath),
    (42, "SB2100B1", "SeaBeam 2100", "SeaBeam 2100 series vendor format", Binary, Little, Swath),
    (43, "SB2100B2", "SeaBeam 2100", "SeaBeam 2100 series vendor format", Binary, Little, Swath),
    (51, "EMOLDRAW", "Simrad", "Old Simrad vendor multibeam format", Binary, Big, Swath),
    (53, "EM12IFRM", "Simrad", "IFREMER TRISMUS format for Simrad EM12", Binary, Big, Swath),
    (54, "EM12DARW", "Simrad", "Simrad EM12S RRS Darwin processed format", Binary, Big, Swath),
    (56, "EM300RAW", "Simrad", "Simrad current multibeam vendor format", Binary, Big, Swath),
    (57, "EM300MBA", "Simrad", "Simrad multibeam processing format", Binary, Big, Swath),
    (58, "EM710RAW", "Kongsberg", "Kongsberg current multibeam vendor format", Binary, Little, Swath),
    (59, "EM710MBA", "Kongsberg", "Kongsberg multibeam processing format", Binary, Little, Swath),
    (61, "MR1PRHIG", "MR1", "Obsolete MR1 post processing format", Binary, Big, Swath),
    (62, "MR1ALDEO", "MR1", "L-DEO MR1 post processing format with travel time", Binary, Big, Swath),
    (63, "MR1BLDEO", "MR1", "L-DEO small MR1 post processing format", Binary, Big, Swath),
    (64, "MR1PRVR2", "MR1", "SOEST MR1 post processing format", Binary, Big, Swath),
    (71, "MBLDEOIH", "Generic", "Generic in-house swath format", Binary, Big, Swath),
    (72, "MBARIMB1", "Generic", "MBARI MB1 bathymetry format", Binary, Little, Swath),
    (75, "MBNETCDF", "Generic", "CARAIBES CDF multibeam", Binary, Big, Swath),
    (76, "MBNCDFXT", "Generic", "CARAIBES CDF multibeam extended", Binary, Big, Swath),
    (81, "CBAT9001", "Reson SeaBat", "Reson SeaBat 9001 shallow water multibeam", Binary, Big, Swath),
    (82, "CBAT8101", "Reson SeaBat", "Reson SeaBat 8101 shallow water multibeam", Binary, Big, Swath),
    (83, "HYPC8101", "Reson SeaBat", "Reson SeaBat 8101 HYPACK format", Text, Na, Swath),
    (84, "XTFR8101", "Reson SeaBat", "XTF format Reson SeaBat 81XX", Binary, Little, Swath),
    (85, "RESONS8K", "Reson SeaBat", "Reson SeaBat 8000 vendor format", Binary, Little, Swath),
    (86, "SBATPROC", "Reson SeaBat", "Reson SeaBat processing format", Binary, Big, Swath),
    (88, "RESON7KR", "Reson SeaBat", "Reson 7K series raw format", Binary, Little, Swath),
    (89, "RESON7K3", "Reson SeaBat", "Reson 7K series version 3 format", Binary, Little, Swath),
    (91, "BCHRTUNB", "Elac", "Elac BottomChart shallow water multibeam", Binary, Little, Swath),
    (92, "ELMK2UNB", "Elac", "Elac BottomChart MkII shallow water multibeam", Binary, Little, Swath),
    (93, "BCHRXUNB", "Elac", "Elac BottomChart xtended shallow water multibeam", Binary, Little, Swath),
    (94, "L3XSERAW", "SeaBeam", "ELAC/SeaBeam XSE vendor format", Binary, Little, Swath),
    (101, "HSMDARAW", "Atlas HSMD", "Atlas HSMD medium depth bathymetry raw", Binary, Little, Swath),
    (102, "HSMDLDIH", "Atlas HSMD", "Atlas HSMD L-DEO in-house format", Binary, Big, Swath),
    (111, "DSL120PF", "WHOI DSL AMS-120", "WHOI DSL AMS-120 processed format, parallel files", Binary, Big, Swath),
    (112, "DSL120SF", "WHOI DSL AMS-120", "WHOI DSL AMS-120 processed format, single file", Binary, Big, Swath),
    (121, "GSFGENMB", "SAIC", "Generic Sensor Format", Binary, Big, Swath),
    (131, "MSTIFFSS", "Marine Sonic", "MSTIFF sidescan format", Binary, Little, Swath),
    (132, "EDGJSTAR", "Edgetech", "Edgetech Jstar format", Binary, Little, Swath),
    (133, "EDGJSTR2", "Edgetech", "Edgetech Jstar format, high frequency sidescan", Binary, Little, Swath),
    (141, "OICGEODA", "OIC", "OIC GeoDAS sidescan format", Binary, Big, Swath),
    (142, "OICMBARI", "OIC", "OIC-style extended swath format", Binary, Big, Swath),
    (151, "OMGHDCSJ", "UNB OMG", "UNB OMG HDCS merged format", Binary, Big, Swath),
    (160, "SEGYSEGY", "SEGY", "SEGY seismic trace format", Binary, Big, Profile),
    (161, "MGD77DAT", "MGD77", "NGDC MGD77 underway geophysics format", Text, Na, Profile),
    (162, "ASCIIXYZ", "Generic", "XYZ (lon lat depth) soundings", Text, Na, Profile),
    (163, "ASCIIYXZ", "Generic", "YXZ (lat lon depth) soundings", Text, Na, Profile),
    (164, "HYDROB93", "NGDC", "NGDC hydrographic soundings, binary", Binary, Big, Profile),
    (165, "MBARIROV", "MBARI", "MBARI ROV navigation format", Text, Na, Nav),
    (166, "MBPRONAV", "Generic", "Simple navigation format", Text, Na, Nav),
    (167, "NVNETCDF", "Generic", "CARAIBES CDF navigation", Binary, Big, Nav),
    (168, "ASCIIXYT", "Generic", "XYT (lon lat topography) soundings", Text, Na, Profile),
    (169, "ASCIIYXT", "Generic", "YXT (lat lon topography) soundings", Text, Na, Profile),
    (170, "MBARROV2", "MBARI", "MBARI ROV navigation format 2", Text, Na, Nav),
    (171, "HS10JAMS", "Furuno", "Furuno HS-10 multibeam format", Text, Na, Swath),
    (172, "HIR2RNAV", "Generic", "SIO GDC R2R navigation format", Text, Na, Nav),
    (173, "MGD77TXT", "MGD77", "NGDC MGD77 underway geophysics format, CRLF records", Text, Na, Profile),
    (174, "MGD77TAB", "MGD77", "NGDC MGD77T tab delimited format", Text, Na, Profile),
    (175, "SOIUSBLN", "Generic", "SOI USBL navigation format", Text, Na, Nav),
    (176, "SOIROVNV", "Generic", "SOI ROV navigation format", Text, Na, Nav),
    (181, "SAMESURF", "STN Atlas", "SURF format", Binary, Little, Swath),
    (182, "HSDS2RAW", "STN Atlas", "HSDS2 raw multibeam format", Binary, Big, Swath),
    (183, "HSDS2LAM", "STN Atlas", "HSDS2 processing format", Binary, Big, Swath),
    (191, "IMAGE83P", "Imagenex", "Imagenex DeltaT 83P format", Binary, Big, Swath),
    (192, "IMAGEMBA", "Imagenex", "Imagenex DeltaT processing format", Binary, Big, Swath),
    (201, "HYSWEEP1", "HYSWEEP", "HYSWEEP multibeam format", Text, Na, Swath),
    (211, "XTFB1624", "Benthos", "Benthos C3D sidescan in XTF", Binary, Little, Swath),
    (221, "SWPLSSXI", "SEA SWATHplus", "SWATHplus intermediate format", Binary, Little, Swath),
    (222, "SWPLSSXP", "SEA SWATHplus", "SWATHplus processed format", Binary, Little, Swath),
    (231, "3DDEPTHP", "3D at Depth", "3D at Depth lidar processed format", Binary, Little, Swath),
    (232, "3DWISSLR", "3D at Depth", "WiSSL lidar raw format", Binary, Little, Swath),
    (233, "3DWISSLP", "3D at Depth", "WiSSL lidar processed format", Binary, Little, Swath),
    (234, "3DWISSL2", "3D at Depth", "WiSSL lidar raw format, version 2", Binary, Little, Swath),
    (241, "WASSPENL", "WASSP", "WASSP multibeam vendor format", Binary, Little, Swath),
    (251, "PHOTGRAM", "Generic", "Photogrammetric topography format", Binary, Little, Swath),
    (261, "KEMKMALL", "Kongsberg", "Kongsberg kmall multibeam format", Binary, Little, Swath),
];

fn codec_for(id: i32) -> Option<Box<dyn CodecFactory>> {
    let factory: Box<dyn CodecFactory> = match id {
        71 => Box::new(LdeoihFactory),
        161 => Box::new(Mgd77Factory { crlf: false }),
        173 => Box::new(Mgd77Factory { crlf: true }),
        162 => Box::new(XyzFactory {
            layout: XyzLayout::LonLatDepth,
        }),
        163 => Box::new(XyzFactory {
            layout: XyzLayout::LatLonDepth,
        }),
        168 => Box::new(XyzFactory {
            layout: XyzLayout::LonLatTopo,
        }),
        169 => Box::new(XyzFactory {
            layout: XyzLayout::LatLonTopo,
        }),
        _ => return None,
    };
    Some(factory)
}

/// Register every catalogued format into `builder`.
pub fn register_builtins(builder: &mut RegistryBuilder) -> Result<()> {
    for &(id, name, family, description, storage, byte_order, content) in CATALOG {
        let descriptor = FormatDescriptor::new(id, name, family, description)
            .storage(storage)
            .byte_order(byte_order)
            .kinds(content.kinds());
        match codec_for(id) {
            Some(factory) => builder.register_codec(descriptor, factory)?,
            None => builder.register(descriptor)?,
        };
    }
    Ok(())
}

/// Number of catalogued formats.
pub fn len() -> usize {
    CATALOG.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique_and_sorted() {
        let ids: Vec<i32> = CATALOG.iter().map(|row| row.0).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_catalog_names_fit_short_form() {
        for row in CATALOG {
            assert_eq!(row.1.len(), 8, "name {} is not 8 characters", row.1);
        }
    }

    #[test]
    fn test_text_formats_have_no_byte_order() {
        for row in CATALOG {
            if matches!(row.4, Text) {
                assert!(matches!(row.5, Na), "format {} is text with byte order", row.0);
            }
        }
    }
}
