// src/models/documents.rs

// Documentos numerados sequencialmente por organização
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PurchaseOrder,
    SupplierInvoice,
}

impl DocumentKind {
    /// Chave da linha em `document_sequences`.
    pub fn key(&self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "purchase_order",
            DocumentKind::SupplierInvoice => "supplier_invoice",
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            DocumentKind::PurchaseOrder => "PO",
            DocumentKind::SupplierInvoice => "INV-",
        }
    }

    /// Tabela e coluna de onde vem o valor inicial do contador.
    pub(crate) fn source(&self) -> (&'static str, &'static str) {
        match self {
            DocumentKind::PurchaseOrder => ("purchase_orders", "po_number"),
            DocumentKind::SupplierInvoice => ("supplier_invoices", "invoice_number"),
        }
    }

    // PO000001 / INV-000001; acima de 999999 o número só cresce
    pub fn format(&self, value: i64) -> String {
        format!("{}{:06}", self.prefix(), value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_with_six_digit_padding() {
        assert_eq!(DocumentKind::PurchaseOrder.format(1), "PO000001");
        assert_eq!(DocumentKind::SupplierInvoice.format(42), "INV-000042");
        assert_eq!(DocumentKind::PurchaseOrder.format(1_234_567), "PO1234567");
    }

    proptest! {
        #[test]
        fn formatted_numbers_keep_prefix_and_value(value in 1i64..100_000_000) {
            for kind in [DocumentKind::PurchaseOrder, DocumentKind::SupplierInvoice] {
                let number = kind.format(value);
                let digits = number.strip_prefix(kind.prefix()).unwrap();
                prop_assert!(digits.len() >= 6);
                prop_assert!(digits.chars().all(|c| c.is_ascii_digit()));
                prop_assert_eq!(digits.parse::<i64>().unwrap(), value);
            }
        }

        #[test]
        fn formatted_numbers_sort_like_their_values(a in 1i64..999_999, b in 1i64..999_999) {
            let kind = DocumentKind::PurchaseOrder;
            prop_assert_eq!(kind.format(a).cmp(&kind.format(b)), a.cmp(&b));
        }
    }
}
