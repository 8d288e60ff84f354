use crate::sv::wallet::PESEWAS;

pub fn format_amount(amount: i64) -> String {
  let sign = if amount < 0 { "-" } else { "" };
  let abs = amount.abs();
  format!("{}{}.{:02} GHS", sign, abs / PESEWAS, abs % PESEWAS)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn amounts_render_as_cedis() {
    assert_eq!(format_amount(0), "0.00 GHS");
    assert_eq!(format_amount(5), "0.05 GHS");
    assert_eq!(format_amount(1234), "12.34 GHS");
    assert_eq!(format_amount(-250), "-2.50 GHS");
  }
}
