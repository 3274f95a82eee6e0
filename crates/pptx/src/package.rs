//! Fixed parts of a generated PPTX package.
//!
//! One slide master, one theme, and a slide layout per [`SlideLayout`].
//! Part names and relationship ids here are shared by the writer.

use prez_core::SlideLayout;
use std::fmt::Write as FmtWrite;

pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

pub(crate) const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Relationship type URIs.
pub(crate) mod rel_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// Content type strings.
mod content_types {
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
}

/// Relationship ids in `ppt/_rels/presentation.xml.rels`. Slides follow.
pub(crate) const MASTER_REL_ID: usize = 1;
pub(crate) const THEME_REL_ID: usize = 2;
pub(crate) const PRES_PROPS_REL_ID: usize = 3;
pub(crate) const TABLE_STYLES_REL_ID: usize = 4;
pub(crate) const FIRST_SLIDE_REL_ID: usize = 5;

/// Empty group shape properties opening every shape tree.
pub(crate) const GROUP_SHAPE_PROPS: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#,
);

/// 1-based part number of a layout.
pub(crate) fn layout_number(layout: SlideLayout) -> usize {
    SlideLayout::ALL
        .iter()
        .position(|l| *l == layout)
        .map(|p| p + 1)
        .unwrap_or(1)
}

/// Layout type attribute value.
fn layout_type(layout: SlideLayout) -> &'static str {
    match layout {
        SlideLayout::Title => "title",
        SlideLayout::TitleAndContent => "obj",
        SlideLayout::SectionHeader => "secHead",
        SlideLayout::Blank => "blank",
    }
}

/// A relationship entry.
pub(crate) struct Relationship<'a> {
    pub id: usize,
    pub rel_type: &'a str,
    pub target: String,
}

/// Render a relationships part.
pub(crate) fn relationships_xml(rels: &[Relationship<'_>]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<Relationships xmlns="{}">"#, NS_RELS);
    for rel in rels {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{}" Target="{}"/>"#,
            rel.id, rel.rel_type, rel.target
        );
    }
    xml.push_str("</Relationships>");
    xml
}

/// Render `[Content_Types].xml` for a deck.
pub(crate) fn content_types_xml(slide_count: usize, media_extensions: &[&str]) -> String {
    let mut xml = String::with_capacity(2048 + slide_count * 160);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<Types xmlns="{}">"#, NS_CONTENT_TYPES);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);

    let mut seen: Vec<&str> = Vec::new();
    for ext in media_extensions {
        if seen.contains(ext) {
            continue;
        }
        seen.push(ext);
        let _ = write!(
            xml,
            r#"<Default Extension="{}" ContentType="image/{}"/>"#,
            ext, ext
        );
    }

    let mut add_override = |part: &str, content_type: &str| {
        let _ = write!(
            xml,
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            part, content_type
        );
    };

    add_override("/ppt/presentation.xml", content_types::PRESENTATION);
    add_override("/ppt/slideMasters/slideMaster1.xml", content_types::SLIDE_MASTER);
    for layout in SlideLayout::ALL {
        add_override(
            &format!("/ppt/slideLayouts/slideLayout{}.xml", layout_number(layout)),
            content_types::SLIDE_LAYOUT,
        );
    }
    add_override("/ppt/theme/theme1.xml", content_types::THEME);
    add_override("/ppt/presProps.xml", content_types::PRES_PROPS);
    add_override("/ppt/tableStyles.xml", content_types::TABLE_STYLES);
    for n in 1..=slide_count {
        add_override(&format!("/ppt/slides/slide{}.xml", n), content_types::SLIDE);
    }

    xml.push_str("</Types>");
    xml
}

/// Package-level relationships pointing at the presentation part.
pub(crate) fn package_rels_xml() -> String {
    relationships_xml(&[Relationship {
        id: 1,
        rel_type: rel_types::OFFICE_DOCUMENT,
        target: "ppt/presentation.xml".to_string(),
    }])
}

/// Render `ppt/presentation.xml`.
pub(crate) fn presentation_xml(slide_count: usize, width: i64, height: i64) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        NS_A, NS_R, NS_P
    );
    let _ = write!(
        xml,
        r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId{}"/></p:sldMasterIdLst>"#,
        MASTER_REL_ID
    );

    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for n in 0..slide_count {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + n,
                FIRST_SLIDE_REL_ID + n
            );
        }
        xml.push_str("</p:sldIdLst>");
    }

    let _ = write!(xml, r#"<p:sldSz cx="{}" cy="{}"/>"#, width, height);
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");
    xml
}

/// Relationships of `ppt/presentation.xml`.
pub(crate) fn presentation_rels_xml(slide_count: usize) -> String {
    let mut rels = vec![
        Relationship {
            id: MASTER_REL_ID,
            rel_type: rel_types::SLIDE_MASTER,
            target: "slideMasters/slideMaster1.xml".to_string(),
        },
        Relationship {
            id: THEME_REL_ID,
            rel_type: rel_types::THEME,
            target: "theme/theme1.xml".to_string(),
        },
        Relationship {
            id: PRES_PROPS_REL_ID,
            rel_type: rel_types::PRES_PROPS,
            target: "presProps.xml".to_string(),
        },
        Relationship {
            id: TABLE_STYLES_REL_ID,
            rel_type: rel_types::TABLE_STYLES,
            target: "tableStyles.xml".to_string(),
        },
    ];
    for n in 0..slide_count {
        rels.push(Relationship {
            id: FIRST_SLIDE_REL_ID + n,
            rel_type: rel_types::SLIDE,
            target: format!("slides/slide{}.xml", n + 1),
        });
    }
    relationships_xml(&rels)
}

/// Render the slide master.
pub(crate) fn slide_master_xml() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        NS_A, NS_R, NS_P
    );
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    xml.push_str(GROUP_SHAPE_PROPS);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" "#,
        r#"hlink="hlink" folHlink="folHlink"/>"#,
    ));

    xml.push_str("<p:sldLayoutIdLst>");
    for (i, layout) in SlideLayout::ALL.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            2147483649u64 + i as u64,
            layout_number(*layout)
        );
    }
    xml.push_str("</p:sldLayoutIdLst>");

    xml.push_str(concat!(
        "<p:txStyles>",
        r#"<p:titleStyle><a:lvl1pPr algn="ctr"><a:defRPr sz="4400" kern="1200">"#,
        r#"<a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mj-lt"/>"#,
        "</a:defRPr></a:lvl1pPr></p:titleStyle>",
        "<p:bodyStyle>",
        r#"<a:lvl1pPr marL="342900" indent="-342900"><a:buFont typeface="Arial"/><a:buChar char="&#8226;"/>"#,
        r#"<a:defRPr sz="3200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mn-lt"/></a:defRPr></a:lvl1pPr>"#,
        r#"<a:lvl2pPr marL="742950" indent="-285750"><a:buFont typeface="Arial"/><a:buChar char="&#8211;"/>"#,
        r#"<a:defRPr sz="2800" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
        r#"<a:latin typeface="+mn-lt"/></a:defRPr></a:lvl2pPr>"#,
        "</p:bodyStyle>",
        r#"<p:otherStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:otherStyle>"#,
        "</p:txStyles>",
    ));
    xml.push_str("</p:sldMaster>");
    xml
}

/// Relationships of the slide master: every layout, then the theme.
pub(crate) fn slide_master_rels_xml() -> String {
    let mut rels: Vec<Relationship<'_>> = SlideLayout::ALL
        .iter()
        .map(|layout| Relationship {
            id: layout_number(*layout),
            rel_type: rel_types::SLIDE_LAYOUT,
            target: format!("../slideLayouts/slideLayout{}.xml", layout_number(*layout)),
        })
        .collect();
    rels.push(Relationship {
        id: SlideLayout::ALL.len() + 1,
        rel_type: rel_types::THEME,
        target: "../theme/theme1.xml".to_string(),
    });
    relationships_xml(&rels)
}

/// Render a slide layout part.
pub(crate) fn slide_layout_xml(layout: SlideLayout) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="{}" preserve="1">"#,
        NS_A,
        NS_R,
        NS_P,
        layout_type(layout)
    );
    let _ = write!(xml, r#"<p:cSld name="{}"><p:spTree>"#, layout.name());
    xml.push_str(GROUP_SHAPE_PROPS);
    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sldLayout>");
    xml
}

/// Relationships of a slide layout.
pub(crate) fn slide_layout_rels_xml() -> String {
    relationships_xml(&[Relationship {
        id: 1,
        rel_type: rel_types::SLIDE_MASTER,
        target: "../slideMasters/slideMaster1.xml".to_string(),
    }])
}

/// Render `ppt/presProps.xml`.
pub(crate) fn pres_props_xml() -> String {
    format!(
        r#"{}<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"/>"#,
        XML_DECL, NS_A, NS_R, NS_P
    )
}

/// Render `ppt/tableStyles.xml`.
pub(crate) fn table_styles_xml() -> String {
    format!(
        r#"{}<a:tblStyleLst xmlns:a="{}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#,
        XML_DECL, NS_A
    )
}

/// Render the Office theme.
pub(crate) fn theme_xml() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<a:theme xmlns:a="{}" name="Office Theme"><a:themeElements>"#, NS_A);

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (name, rgb) in [
        ("dk2", "1F497D"),
        ("lt2", "EEECE1"),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ] {
        let _ = write!(xml, r#"<a:{0}><a:srgbClr val="{1}"/></a:{0}>"#, name, rgb);
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    for font in ["majorFont", "minorFont"] {
        let _ = write!(
            xml,
            r#"<a:{0}><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:{0}>"#,
            font
        );
    }
    xml.push_str("</a:fontScheme>");

    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    xml.push_str(r#"<a:fmtScheme name="Office"><a:fillStyleLst>"#);
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:fillStyleLst><a:lnStyleLst>");
    for width in [9525, 25400, 38100] {
        let _ = write!(xml, r#"<a:ln w="{}">{}</a:ln>"#, width, solid);
    }
    xml.push_str("</a:lnStyleLst><a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst><a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(solid);
    }
    xml.push_str("</a:bgFillStyleLst></a:fmtScheme>");

    xml.push_str("</a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}
