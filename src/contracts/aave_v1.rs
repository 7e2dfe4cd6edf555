use ethers::prelude::*;

abigen!(
    AaveV1AToken,
    r#"[
        function symbol() external view returns (string)
        function decimals() external view returns (uint8)
        function underlyingAssetAddress() external view returns (address)
        event MintOnDeposit(address indexed _from, uint256 _value, uint256 _fromBalanceIncrease, uint256 _fromIndex)
        event BurnOnLiquidation(address indexed _from, uint256 _value, uint256 _fromBalanceIncrease, uint256 _fromIndex)
    ]"#
);

abigen!(
    AaveV1LendingPoolAddressesProvider,
    r#"[
        function getLendingPoolDataProvider() external view returns (address)
    ]"#
);

abigen!(
    AaveV1LendingPoolDataProvider,
    r#"[
        function getReserveConfigurationData(address _reserve) external view returns (uint256 ltv, uint256 liquidationThreshold, uint256 liquidationBonus, address rateStrategyAddress, bool usageAsCollateralEnabled, bool borrowingEnabled, bool stableBorrowRateEnabled, bool isActive)
        function getReserveData(address _reserve) external view returns (uint256 totalLiquidity, uint256 availableLiquidity, uint256 totalBorrowsStable, uint256 totalBorrowsVariable, uint256 liquidityRate, uint256 variableBorrowRate, uint256 stableBorrowRate, uint256 averageStableBorrowRate, uint256 utilizationRate, uint256 liquidityIndex, uint256 variableBorrowIndex, address aTokenAddress, uint40 lastUpdateTimestamp)
    ]"#
);
