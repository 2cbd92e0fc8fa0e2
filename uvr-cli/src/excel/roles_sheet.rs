//! `IT_AMS_Roles` reference sheet describing each access tag

use anyhow::Result;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use crate::reconcile::AccessTag;

pub const ROLES_SHEET_NAME: &str = "IT_AMS_Roles";

const HEADERS: [&str; 4] = ["IT_AMS_Roles", "Definitions", "IT-AMS Access", "Features Access"];
const WIDTHS: [f64; 4] = [15.0, 45.0, 38.0, 60.0];

const SEE_ABOVE: &str = "See above PS and GS access";

const PS_DEFINITION: &str = "When assigned on a RAN/Special/AIAN-Def/Follow-up review, the users with this role:
  1. Participates in the data collection, validation process when review is led by Regional office
  2. Supports Follow-up lead (FUL) in the data collection and validation process when review is led by DLH FUL
  3. Helps Regional Program Manager's (RPM) or Follow-up Manager (FUM) to finalize the report";

const GS_DEFINITION: &str = "When assigned on a RAN/Special/AIAN-Def/Follow-Up review(s), the users with this role:
  1. Participates in the data collection process of the assigned review";

const REPORT_REVIEW_DEFINITION: &str = "When assigned on a RAN/Special/AIAN-Def/Follow-Up review(s), the users with this role:
  1. Participates in the report review process of the assigned review";

const PS_ACCESS: &str = "1. Home tab and its contents
2. Reviews tab and assigned reviews
3. Tasks tab and assigned tasks
4. Reports tab, assigned reports and Signed/shipped report of the assigned region
5. Grantees tab and assigned regions grantees monitoring history information
6. Dashboard tab and contents user is authorized to view";

const GS_ACCESS: &str = "1. Home tab and its contents
2. Reviews tab and assigned reviews
3. Tasks tab and assigned tasks
4. Grantees tab and assigned regions grantees monitoring history information
5. Dashboard tab and contents user is authorized to view";

const SUPERVISOR_ACCESS: &str = "1. Home tab and its contents
2. Reviews tab and assigned reviews
3. Tasks tab and assigned tasks
4. Reports tab, assigned reports and Signed/shipped report of the assigned region
5. Grantees tab and all regions grantees monitoring history information
6. My Regional reviews tab and reviews of the assigned region
7. Dashboard tab and contents user is authorized to view";

const PS_FEATURES: &str = "1. View and edit Review details of the assigned page
2. View and Edit data collection forms for assigned review
3. Read only access to Manifest, Eligibility files, Report preview, Pre-site, Evidence Binder, Findings page, grantee detail page, signed report search for all grantees across regions, all completed reviews across regions
4. View and share the Report with internal team/external users
5. View internal report shared log and reply to internal conversation thread
6. View the external Share report log
7. View and Edit the users self-profile";

const GS_FEATURES: &str = "1. View Review details page of the assigned page
2. View and Edit data collection forms for assigned review
3. Read only access to Manifest, Eligibility files, Report preview, Pre-site, Evidence Binder, Findings page, grantee detail page, signed report search for all grantees across regions, all completed reviews across regions
4. View and Edit the user self-profile";

const SUPERVISOR_FEATURES: &str = "1. View and edit Review details of the assigned page
2. View and Edit data collection forms for assigned review
3. Read only access to Manifest, Eligibility files, Report preview, Pre-site, Evidence Binder, Findings page, grantee detail page, signed report search for all grantees across regions, all completed reviews across regions
4. View and share the Report with internal team/external users
5. View internal report shared log and reply to internal conversation thread
6. View the external Share report log
7. View and Edit the user self-profile
8. View the list of reviews in their assigned region";

/// Definition, IT-AMS access and feature access texts for a tag
pub fn tag_description(tag: AccessTag) -> [&'static str; 3] {
    match tag {
        AccessTag::Ps => [PS_DEFINITION, PS_ACCESS, PS_FEATURES],
        AccessTag::Gs => [GS_DEFINITION, GS_ACCESS, GS_FEATURES],
        AccessTag::PsAndGs => [SEE_ABOVE, SEE_ABOVE, SEE_ABOVE],
        AccessTag::Sps | AccessTag::Rpm => {
            [REPORT_REVIEW_DEFINITION, SUPERVISOR_ACCESS, SUPERVISOR_FEATURES]
        }
    }
}

fn cell_format() -> Format {
    Format::new()
        .set_text_wrap()
        .set_align(FormatAlign::Top)
        .set_align(FormatAlign::Left)
        .set_border(FormatBorder::Thin)
}

/// Append the reference sheet to a workbook
pub fn write_roles_sheet(workbook: &mut Workbook) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(ROLES_SHEET_NAME)?;

    let header_format = cell_format()
        .set_font_name("Arial")
        .set_font_size(11)
        .set_bold()
        .set_background_color(Color::RGB(0xCCFFCC));
    let tag_format = cell_format()
        .set_font_name("Arial")
        .set_font_size(11)
        .set_bold()
        .set_align(FormatAlign::Center);
    let text_format = cell_format().set_font_name("Arial").set_font_size(10);
    let italic_format = text_format.clone().set_italic();

    for (col, (header, width)) in HEADERS.iter().zip(WIDTHS).enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        sheet.set_column_width(col as u16, width)?;
    }

    for (idx, tag) in AccessTag::DROPDOWN.iter().enumerate() {
        let row = (idx + 1) as u32;
        sheet.write_string_with_format(row, 0, tag.label(), &tag_format)?;
        let format = if *tag == AccessTag::PsAndGs {
            &italic_format
        } else {
            &text_format
        };
        for (offset, text) in tag_description(*tag).iter().enumerate() {
            sheet.write_string_with_format(row, (offset + 1) as u16, *text, format)?;
        }
    }

    Ok(())
}
