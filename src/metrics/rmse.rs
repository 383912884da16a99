use crate::metrics::PredictionMetric;

/// Root-mean-squared error over all scored (predicted, actual) pairs.
pub struct Rmse {
    sum_of_squared_errors: f64,
    qty: usize,
}

impl Default for Rmse {
    fn default() -> Self {
        Self::new()
    }
}

impl Rmse {
    pub fn new() -> Rmse {
        Rmse {
            sum_of_squared_errors: 0_f64,
            qty: 0,
        }
    }
}

impl PredictionMetric for Rmse {
    fn add(&mut self, predicted: f64, actual: f64) {
        let error = predicted - actual;
        self.sum_of_squared_errors += error * error;
        self.qty += 1;
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            (self.sum_of_squared_errors / self.qty as f64).sqrt()
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "Rmse".to_string()
    }
}

#[cfg(test)]
mod rmse_test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn should_calculate_rmse() {
        let mut mymetric = Rmse::new();
        mymetric.add(3.0, 4.0);
        mymetric.add(5.0, 3.0);
        // squared errors 1 and 4, mean 2.5
        assert!(approx_eq!(f64, 2.5_f64.sqrt(), mymetric.result(), epsilon = 1e-12));
        assert_eq!("Rmse", mymetric.get_name());
    }

    #[test]
    fn perfect_predictions_have_zero_rmse() {
        let mut mymetric = Rmse::new();
        mymetric.add(4.0, 4.0);
        mymetric.add(1.0, 1.0);
        assert_eq!(0.0, mymetric.result());
    }

    #[test]
    fn empty_metric_reports_zero() {
        assert_eq!(0.0, Rmse::new().result());
    }
}
