use partner_shared::business_partner::BusinessPartner;

const HEADINGS: [&str; 6] = ["Code", "Name", "Type", "Email", "Phone", "Mobile"];

/// Renders the list as a plain text table
pub fn render_partners(partners: &[BusinessPartner]) -> String {
    if partners.is_empty() {
        return "No contacts found".to_string();
    }
    let rows: Vec<[String; 6]> = partners.iter().map(row).collect();
    let mut widths = HEADINGS.map(str::len);
    for row in rows.iter() {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_line(&HEADINGS.map(String::from), &widths));
    lines.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(rows.iter().map(|row| format_line(row, &widths)));
    lines.join("\n")
}

fn row(partner: &BusinessPartner) -> [String; 6] {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    [
        partner.card_code.to_string(),
        partner.card_name.clone(),
        partner.card_type.to_string(),
        optional(&partner.email_address),
        optional(&partner.phone1),
        optional(&partner.cellular),
    ]
}

fn format_line(cells: &[String; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
